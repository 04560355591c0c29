//! Like synchronization.
//!
//! The like relation is the source of truth. `Post::likes_count` is a
//! denormalized copy that only [`LikeEngine::sync_count`] writes, always
//! from a fresh count of the relation.
//!
//! A UI toggle runs as:
//! 1. the caller shows [`PendingToggle::tentative`](crate::domain::PendingToggle::tentative);
//! 2. [`LikeEngine::toggle`] performs the mutation;
//! 3. on success it recounts and syncs, returning the authoritative snapshot;
//! 4. on error the caller shows [`PendingToggle::revert`](crate::domain::PendingToggle::revert).
//!
//! Errors are never retried or swallowed here.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Like, LikeAction, LikeSnapshot};
use crate::error::{DomainError, RepoError};
use crate::ports::{LikeRepository, PostRepository};

/// Outcome of a reconciliation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

pub struct LikeEngine {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeEngine {
    pub fn new(posts: Arc<dyn PostRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { posts, likes }
    }

    async fn ensure_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await
            .map_err(|e| e.into_domain("Post", post_id))?;

        match post {
            Some(_) => Ok(()),
            None => Err(DomainError::post_not_found(post_id)),
        }
    }

    pub async fn has_liked(&self, post_id: Uuid, user_id: Option<Uuid>) -> Result<bool, DomainError> {
        let user_id = user_id.ok_or(DomainError::NotAuthenticated)?;
        self.likes
            .exists(post_id, user_id)
            .await
            .map_err(|e| e.into_domain("Post", post_id))
    }

    /// Number of likes, counted from the relation rather than the cached field.
    pub async fn likes_count(&self, post_id: Uuid) -> Result<u64, DomainError> {
        self.likes
            .count_for_post(post_id)
            .await
            .map_err(|e| e.into_domain("Post", post_id))
    }

    /// Like a post. Returns `false` if the user already liked it.
    pub async fn like(&self, post_id: Uuid, user_id: Option<Uuid>) -> Result<bool, DomainError> {
        let user_id = user_id.ok_or(DomainError::NotAuthenticated)?;
        self.ensure_post(post_id).await?;

        if self.has_liked(post_id, Some(user_id)).await? {
            tracing::debug!(%post_id, %user_id, "Post already liked");
            return Ok(false);
        }

        // A concurrent like for the same pair may land between the check and
        // the insert; the store's unique key turns the loser into a no-op.
        let created = self
            .likes
            .insert(Like::new(post_id, user_id))
            .await
            .map_err(|e| e.into_domain("Post", post_id))?;

        tracing::debug!(%post_id, %user_id, created, "Like recorded");
        Ok(created)
    }

    /// Remove a like. Returns `false` if there was nothing to remove.
    pub async fn unlike(&self, post_id: Uuid, user_id: Option<Uuid>) -> Result<bool, DomainError> {
        let user_id = user_id.ok_or(DomainError::NotAuthenticated)?;
        self.ensure_post(post_id).await?;

        let removed = self
            .likes
            .delete(post_id, user_id)
            .await
            .map_err(|e| e.into_domain("Post", post_id))?;

        tracing::debug!(%post_id, %user_id, removed, "Like removed");
        Ok(removed)
    }

    /// Recount likes and store the result on the post.
    pub async fn sync_count(&self, post_id: Uuid) -> Result<u64, DomainError> {
        self.ensure_post(post_id).await?;
        let count = self.likes_count(post_id).await?;

        self.posts
            .set_likes_count(post_id, count)
            .await
            .map_err(|e| e.into_domain("Post", post_id))?;

        Ok(count)
    }

    /// Apply a like or unlike and return the reconciled state.
    pub async fn toggle(
        &self,
        post_id: Uuid,
        user_id: Option<Uuid>,
        action: LikeAction,
    ) -> Result<LikeSnapshot, DomainError> {
        let result = match action {
            LikeAction::Like => self.like(post_id, user_id).await,
            LikeAction::Unlike => self.unlike(post_id, user_id).await,
        };
        if let Err(e) = result {
            tracing::warn!(%post_id, ?action, error = %e, "Like mutation failed");
            return Err(e);
        }

        let count = self.sync_count(post_id).await?;
        Ok(LikeSnapshot::new(action == LikeAction::Like, count))
    }

    /// Current state for a viewer; anonymous viewers never have liked.
    pub async fn snapshot(
        &self,
        post_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<LikeSnapshot, DomainError> {
        self.ensure_post(post_id).await?;
        let liked = match user_id {
            Some(_) => self.has_liked(post_id, user_id).await?,
            None => false,
        };
        let count = self.likes_count(post_id).await?;
        Ok(LikeSnapshot::new(liked, count))
    }

    /// Resync every post's counter. Individual failures are logged and counted.
    pub async fn sync_all(&self) -> Result<SyncReport, DomainError> {
        let ids = self
            .posts
            .all_ids()
            .await
            .map_err(RepoError::into_domain_query)?;

        let mut report = SyncReport::default();
        for post_id in ids {
            match self.sync_count(post_id).await {
                Ok(_) => report.synced += 1,
                Err(e) => {
                    tracing::warn!(%post_id, error = %e, "Failed to sync like count");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(synced = report.synced, failed = report.failed, "Like counts reconciled");
        Ok(report)
    }
}
