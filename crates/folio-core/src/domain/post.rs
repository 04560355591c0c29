use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PostStatus;

/// Post entity - a blog article with a lifecycle status.
///
/// `likes_count` is a denormalized copy of the number of likes. Only
/// [`LikeEngine::sync_count`](crate::services::LikeEngine::sync_count)
/// writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub likes_count: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new draft post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            status: PostStatus::Draft,
            likes_count: 0,
            published_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Apply a status change.
    ///
    /// `published_at` is stamped the first time the post goes live and kept
    /// across later unpublish/republish cycles.
    pub fn with_status(mut self, status: PostStatus, now: DateTime<Utc>) -> Self {
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
        self.updated_at = Some(now);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_post_is_unliked_draft() {
        let post = Post::new(Uuid::new_v4(), "Hello".to_string(), "Body".to_string());
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.likes_count, 0);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_published_at_set_once() {
        let first = Utc::now();
        let later = first + Duration::days(3);

        let post = Post::new(Uuid::new_v4(), "t".to_string(), "c".to_string())
            .with_status(PostStatus::Published, first)
            .with_status(PostStatus::Archived, later)
            .with_status(PostStatus::Published, later);

        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.updated_at, Some(later));
    }
}
