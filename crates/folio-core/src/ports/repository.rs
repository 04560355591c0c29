use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Like, Post, PostStatus, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// `save` writes content fields only. The denormalized like counter is
/// written through [`PostRepository::set_likes_count`] and nothing else.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts in `status`, most recently published first.
    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError>;

    async fn all_ids(&self) -> Result<Vec<Uuid>, RepoError>;

    /// Single-document status write.
    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Post, RepoError>;

    async fn set_likes_count(&self, id: Uuid, count: u64) -> Result<(), RepoError>;
}

/// Store for the `(post, user)` like relation.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    /// Insert the relation. Returns `false` when the pair was already present.
    ///
    /// Implementations must enforce pair uniqueness atomically; this is the
    /// only guard against concurrent likes by the same user.
    async fn insert(&self, like: Like) -> Result<bool, RepoError>;

    /// Remove the relation. Returns whether anything was removed.
    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
