//! In-memory implementation of every repository port.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{Like, Post, PostStatus, User};
use folio_core::error::RepoError;
use folio_core::ports::{BaseRepository, LikeRepository, PostRepository, UserRepository};

/// Users, posts and likes kept in process memory behind async locks.
///
/// Behaves like the PostgreSQL repositories: like pairs are unique, likes
/// must reference an existing post, and saving a post leaves its like
/// counter untouched. Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
    likes: RwLock<HashMap<(Uuid, Uuid), Like>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        post.likes_count = posts.get(&post.id).map(|p| p.likes_count).unwrap_or(0);
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        if posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Cascade like the foreign key does.
        self.likes.write().await.retain(|(post_id, _), _| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(found)
    }

    async fn all_ids(&self) -> Result<Vec<Uuid>, RepoError> {
        Ok(self.posts.read().await.keys().copied().collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.status = status;
        post.published_at = published_at;
        post.updated_at = Some(Utc::now());
        Ok(post.clone())
    }

    async fn set_likes_count(&self, id: Uuid, count: u64) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.likes_count = count;
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.likes.read().await.contains_key(&(post_id, user_id)))
    }

    async fn insert(&self, like: Like) -> Result<bool, RepoError> {
        // Lock order: posts, then likes.
        let posts = self.posts.read().await;
        if !posts.contains_key(&like.post_id) {
            return Err(RepoError::NotFound);
        }

        let mut likes = self.likes.write().await;
        let key = (like.post_id, like.user_id);
        if likes.contains_key(&key) {
            return Ok(false);
        }
        likes.insert(key, like);
        Ok(true)
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .likes
            .write()
            .await
            .remove(&(post_id, user_id))
            .is_some())
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let likes = self.likes.read().await;
        Ok(likes.keys().filter(|(p, _)| *p == post_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio_core::domain::{Actor, LikeAction, Role};
    use folio_core::{LikeEngine, PostService};

    use super::*;

    async fn seeded() -> (Arc<InMemoryStore>, Post) {
        let store = Arc::new(InMemoryStore::new());
        let post = Post::new(Uuid::new_v4(), "Title".to_string(), "Body".to_string())
            .with_status(PostStatus::Published, Utc::now());
        let saved = BaseRepository::<Post, Uuid>::save(store.as_ref(), post)
            .await
            .unwrap();
        (store, saved)
    }

    #[tokio::test]
    async fn test_like_pair_is_unique() {
        let (store, post) = seeded().await;
        let user_id = Uuid::new_v4();

        assert!(store.insert(Like::new(post.id, user_id)).await.unwrap());
        assert!(!store.insert(Like::new(post.id, user_id)).await.unwrap());
        assert_eq!(store.count_for_post(post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_like_requires_post() {
        let store = InMemoryStore::new();
        let result = store.insert(Like::new(Uuid::new_v4(), Uuid::new_v4())).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_save_keeps_like_counter() {
        let (store, mut post) = seeded().await;
        store.set_likes_count(post.id, 5).await.unwrap();

        post.title = "Edited".to_string();
        post.likes_count = 0;
        let saved = BaseRepository::<Post, Uuid>::save(store.as_ref(), post)
            .await
            .unwrap();

        assert_eq!(saved.title, "Edited");
        assert_eq!(saved.likes_count, 5);
    }

    #[tokio::test]
    async fn test_deleting_post_drops_likes() {
        let (store, post) = seeded().await;
        store.insert(Like::new(post.id, Uuid::new_v4())).await.unwrap();

        BaseRepository::<Post, Uuid>::delete(store.as_ref(), post.id)
            .await
            .unwrap();

        assert_eq!(store.count_for_post(post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        let first = User::new("a@example.com".into(), "h".into(), Role::User);
        let second = User::new("a@example.com".into(), "h".into(), Role::User);

        BaseRepository::<User, Uuid>::save(&store, first).await.unwrap();
        let err = BaseRepository::<User, Uuid>::save(&store, second)
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_engine_concurrent_likes_on_shared_store() {
        let (store, post) = seeded().await;
        let engine = Arc::new(LikeEngine::new(store.clone(), store.clone()));
        let post_id = post.id;

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let engine = engine.clone();
                let user_id = Uuid::new_v4();
                tokio::spawn(async move { engine.like(post_id, Some(user_id)).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }

        assert_eq!(engine.sync_count(post_id).await.unwrap(), 3);
        let stored = BaseRepository::<Post, Uuid>::find_by_id(store.as_ref(), post_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.likes_count, 3);
    }

    #[tokio::test]
    async fn test_engine_toggle_round_trip() {
        let (store, post) = seeded().await;
        let engine = LikeEngine::new(store.clone(), store.clone());
        let user = Some(Uuid::new_v4());

        let liked = engine.toggle(post.id, user, LikeAction::Like).await.unwrap();
        assert!(liked.liked);
        assert_eq!(liked.count, 1);

        let unliked = engine.toggle(post.id, user, LikeAction::Unlike).await.unwrap();
        assert!(!unliked.liked);
        assert_eq!(unliked.count, 0);
    }

    #[tokio::test]
    async fn test_status_flow_persists() {
        let store = Arc::new(InMemoryStore::new());
        let service = PostService::new(store.clone());
        let author = Actor::authenticated(Uuid::new_v4(), Role::User);
        let admin = Actor::authenticated(Uuid::new_v4(), Role::Admin);

        let post = service
            .create(&author, "Hello".to_string(), String::new())
            .await
            .unwrap();
        service
            .change_status(&author, post.id, PostStatus::Review)
            .await
            .unwrap();
        service
            .change_status(&admin, post.id, PostStatus::Published)
            .await
            .unwrap();

        let published = service.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].published_at.is_some());
    }
}
