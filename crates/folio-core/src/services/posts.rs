use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::lifecycle::{self, StatusOptions};
use crate::domain::{Actor, Post, PostStatus, Role};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Post reads and lifecycle changes on behalf of an actor.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(|e| e.into_domain("Post", id))?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Fetch a post if `actor` may read it. Unpublished posts are reported
    /// as missing to anyone but their author and admins.
    pub async fn visible_to(&self, actor: &Actor, id: Uuid) -> Result<Post, DomainError> {
        let post = self.get(id).await?;
        if post.status.is_public() || actor.role == Role::Admin || actor.is_author_of(&post) {
            Ok(post)
        } else {
            Err(DomainError::post_not_found(id))
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        title: String,
        content: String,
    ) -> Result<Post, DomainError> {
        let author_id = actor.require_user_id()?;
        if actor.role == Role::Guest {
            return Err(DomainError::PermissionDenied(
                "guests cannot write posts".to_string(),
            ));
        }
        if title.trim().is_empty() {
            return Err(DomainError::Validation("Title must not be empty".to_string()));
        }

        let post = Post::new(author_id, title, content);
        let id = post.id;
        let saved = self
            .posts
            .save(post)
            .await
            .map_err(|e| e.into_domain("Post", id))?;

        tracing::info!(post_id = %saved.id, author_id = %author_id, "Post created");
        Ok(saved)
    }

    pub async fn list_published(&self) -> Result<Vec<Post>, DomainError> {
        self.posts
            .find_by_status(PostStatus::Published)
            .await
            .map_err(RepoError::into_domain_query)
    }

    pub async fn list_by_author(&self, actor: &Actor) -> Result<Vec<Post>, DomainError> {
        let author_id = actor.require_user_id()?;
        self.posts
            .find_by_author(author_id)
            .await
            .map_err(RepoError::into_domain_query)
    }

    /// Statuses the actor may pick for a post they can see.
    pub async fn status_options(
        &self,
        actor: &Actor,
        id: Uuid,
    ) -> Result<StatusOptions, DomainError> {
        let post = self.visible_to(actor, id).await?;
        Ok(lifecycle::status_options(
            actor.role,
            post.status,
            actor.is_author_of(&post),
        ))
    }

    /// Move a post to `next` if the actor is allowed to.
    ///
    /// Choosing the current status succeeds without writing anything.
    pub async fn change_status(
        &self,
        actor: &Actor,
        id: Uuid,
        next: PostStatus,
    ) -> Result<Post, DomainError> {
        let post = self.visible_to(actor, id).await?;
        lifecycle::check_transition(actor.role, post.status, next, actor.is_author_of(&post))?;

        if next == post.status {
            return Ok(post);
        }

        let from = post.status;
        let updated = post.with_status(next, Utc::now());
        let saved = self
            .posts
            .update_status(id, updated.status, updated.published_at)
            .await
            .map_err(|e| e.into_domain("Post", id))?;

        tracing::info!(post_id = %id, %from, to = %next, role = %actor.role, "Post status changed");
        Ok(saved)
    }
}
