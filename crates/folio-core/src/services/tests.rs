use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{LikeEngine, PostService};
use crate::domain::{Actor, Like, LikeAction, LikeSnapshot, PendingToggle, Post, PostStatus, Role};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, LikeRepository, PostRepository};

#[derive(Default)]
struct State {
    posts: HashMap<Uuid, Post>,
    likes: HashSet<(Uuid, Uuid)>,
}

/// Minimal store double. `deny_writes` makes every mutation fail the way a
/// security rule rejection would; `deny_reads` does the same for list queries.
#[derive(Default)]
struct FakeStore {
    state: Mutex<State>,
    deny_writes: AtomicBool,
    deny_reads: AtomicBool,
}

impl FakeStore {
    fn check_writable(&self) -> Result<(), RepoError> {
        if self.deny_writes.load(Ordering::SeqCst) {
            Err(RepoError::PermissionDenied("write rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_listable(&self) -> Result<(), RepoError> {
        if self.deny_reads.load(Ordering::SeqCst) {
            Err(RepoError::PermissionDenied("list rejected".to_string()))
        } else {
            Ok(())
        }
    }

    async fn seed(&self, post: Post) -> Uuid {
        let id = post.id;
        self.state.lock().await.posts.insert(id, post);
        id
    }

    async fn cached_count(&self, id: Uuid) -> u64 {
        self.state.lock().await.posts[&id].likes_count
    }

    async fn relation_len(&self, post_id: Uuid) -> usize {
        let state = self.state.lock().await;
        state.likes.iter().filter(|(p, _)| *p == post_id).count()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.check_writable()?;
        self.state.lock().await.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.state.lock().await.posts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakeStore {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.check_listable()?;
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError> {
        self.check_listable()?;
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn all_ids(&self) -> Result<Vec<Uuid>, RepoError> {
        self.check_listable()?;
        Ok(self.state.lock().await.posts.keys().copied().collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Post, RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let post = state.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.status = status;
        post.published_at = published_at;
        post.updated_at = Some(Utc::now());
        Ok(post.clone())
    }

    async fn set_likes_count(&self, id: Uuid, count: u64) -> Result<(), RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let post = state.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.likes_count = count;
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for FakeStore {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.state.lock().await.likes.contains(&(post_id, user_id)))
    }

    async fn insert(&self, like: Like) -> Result<bool, RepoError> {
        self.check_writable()?;
        Ok(self
            .state
            .lock()
            .await
            .likes
            .insert((like.post_id, like.user_id)))
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        self.check_writable()?;
        Ok(self.state.lock().await.likes.remove(&(post_id, user_id)))
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.relation_len(post_id).await as u64)
    }
}

fn engine(store: &Arc<FakeStore>) -> LikeEngine {
    LikeEngine::new(store.clone(), store.clone())
}

fn published_post(author_id: Uuid) -> Post {
    Post::new(author_id, "Hello".to_string(), "World".to_string())
        .with_status(PostStatus::Published, Utc::now())
}

#[tokio::test]
async fn test_like_twice_counts_once() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;
    let user = Some(Uuid::new_v4());

    assert!(engine.like(post_id, user).await.unwrap());
    assert!(!engine.like(post_id, user).await.unwrap());

    assert_eq!(engine.sync_count(post_id).await.unwrap(), 1);
    assert_eq!(store.relation_len(post_id).await, 1);
    assert!(engine.has_liked(post_id, user).await.unwrap());
}

#[tokio::test]
async fn test_unlike_without_like_is_noop() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;

    let removed = engine.unlike(post_id, Some(Uuid::new_v4())).await.unwrap();

    assert!(!removed);
    assert_eq!(engine.likes_count(post_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_like_then_unlike_restores_count() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;
    engine.like(post_id, Some(Uuid::new_v4())).await.unwrap();
    let before = engine.sync_count(post_id).await.unwrap();

    let user = Some(Uuid::new_v4());
    engine.toggle(post_id, user, LikeAction::Like).await.unwrap();
    let after = engine.toggle(post_id, user, LikeAction::Unlike).await.unwrap();

    assert_eq!(after, LikeSnapshot::new(false, before));
    assert_eq!(store.cached_count(post_id).await, before);
}

#[tokio::test]
async fn test_concurrent_likes_from_distinct_users() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let (ra, rb, rc) = tokio::join!(
        engine.like(post_id, Some(a)),
        engine.like(post_id, Some(b)),
        engine.like(post_id, Some(c)),
    );
    assert!(ra.unwrap() && rb.unwrap() && rc.unwrap());

    assert_eq!(engine.sync_count(post_id).await.unwrap(), 3);
    assert_eq!(store.cached_count(post_id).await, 3);
    assert_eq!(store.relation_len(post_id).await, 3);
}

#[tokio::test]
async fn test_concurrent_likes_from_same_user() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;
    let user = Some(Uuid::new_v4());

    let (first, second) = tokio::join!(engine.like(post_id, user), engine.like(post_id, user));

    // Exactly one of the two calls creates the relation.
    assert!(first.unwrap() ^ second.unwrap());
    assert_eq!(engine.sync_count(post_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_sync_count_repairs_drift() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let mut post = published_post(Uuid::new_v4());
    post.likes_count = 42;
    let post_id = store.seed(post).await;
    engine.like(post_id, Some(Uuid::new_v4())).await.unwrap();

    assert_eq!(engine.sync_count(post_id).await.unwrap(), 1);
    assert_eq!(store.cached_count(post_id).await, 1);
}

#[tokio::test]
async fn test_missing_user_is_not_authenticated() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;

    assert!(matches!(
        engine.has_liked(post_id, None).await,
        Err(DomainError::NotAuthenticated)
    ));
    assert!(matches!(
        engine.like(post_id, None).await,
        Err(DomainError::NotAuthenticated)
    ));

    // Anonymous viewers can still read the state.
    let snapshot = engine.snapshot(post_id, None).await.unwrap();
    assert_eq!(snapshot, LikeSnapshot::new(false, 0));
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let missing = Uuid::new_v4();

    let err = engine.like(missing, Some(Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { id, .. } if id == missing));

    assert!(engine.sync_count(missing).await.is_err());
}

#[tokio::test]
async fn test_rejected_write_surfaces_and_caller_reverts() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let post_id = store.seed(published_post(Uuid::new_v4())).await;
    store.deny_writes.store(true, Ordering::SeqCst);

    let shown = LikeSnapshot::new(false, 0);
    let pending = PendingToggle::begin(shown);
    let result = engine
        .toggle(post_id, Some(Uuid::new_v4()), pending.intent())
        .await;

    let err = result.unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(pending.revert(), shown);
    assert_eq!(store.relation_len(post_id).await, 0);
}

#[tokio::test]
async fn test_sync_all_covers_every_post() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    let first = store.seed(published_post(Uuid::new_v4())).await;
    let second = store.seed(published_post(Uuid::new_v4())).await;
    engine.like(first, Some(Uuid::new_v4())).await.unwrap();

    let report = engine.sync_all().await.unwrap();

    assert_eq!(report.synced, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(store.cached_count(first).await, 1);
    assert_eq!(store.cached_count(second).await, 0);
}

#[tokio::test]
async fn test_sync_all_keeps_permission_errors() {
    let store = Arc::new(FakeStore::default());
    let engine = engine(&store);
    store.seed(published_post(Uuid::new_v4())).await;
    store.deny_reads.store(true, Ordering::SeqCst);

    let err = engine.sync_all().await.unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn test_author_submits_draft_for_review() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());
    let author = Actor::authenticated(Uuid::new_v4(), Role::User);
    let post = service
        .create(&author, "Title".to_string(), "Body".to_string())
        .await
        .unwrap();

    let options = service.status_options(&author, post.id).await.unwrap();
    assert_eq!(options.allowed, vec![PostStatus::Draft, PostStatus::Review]);

    let updated = service
        .change_status(&author, post.id, PostStatus::Review)
        .await
        .unwrap();
    assert_eq!(updated.status, PostStatus::Review);

    let err = service
        .change_status(&author, post.id, PostStatus::Published)
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn test_admin_publish_stamps_published_at() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());
    let author_id = Uuid::new_v4();
    let post_id = store
        .seed(Post::new(author_id, "t".to_string(), "c".to_string()))
        .await;
    let admin = Actor::authenticated(Uuid::new_v4(), Role::Admin);

    let published = service
        .change_status(&admin, post_id, PostStatus::Published)
        .await
        .unwrap();

    assert_eq!(published.status, PostStatus::Published);
    assert!(published.published_at.is_some());
}

#[tokio::test]
async fn test_same_status_is_noop_even_when_writes_denied() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());
    let post_id = store.seed(published_post(Uuid::new_v4())).await;
    store.deny_writes.store(true, Ordering::SeqCst);

    let post = service
        .change_status(&Actor::guest(), post_id, PostStatus::Published)
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Published);
}

#[tokio::test]
async fn test_drafts_hidden_from_other_users() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());
    let author_id = Uuid::new_v4();
    let post_id = store
        .seed(Post::new(author_id, "t".to_string(), "c".to_string()))
        .await;

    let stranger = Actor::authenticated(Uuid::new_v4(), Role::User);
    assert!(service.visible_to(&stranger, post_id).await.is_err());
    assert!(service.visible_to(&Actor::guest(), post_id).await.is_err());

    let author = Actor::authenticated(author_id, Role::User);
    assert!(service.visible_to(&author, post_id).await.is_ok());
}

#[tokio::test]
async fn test_stranger_cannot_change_hidden_draft() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());
    let post_id = store
        .seed(Post::new(Uuid::new_v4(), "t".to_string(), "c".to_string()))
        .await;
    let stranger = Actor::authenticated(Uuid::new_v4(), Role::User);

    // Same-status and real transitions both look like a missing post.
    for next in [PostStatus::Draft, PostStatus::Review] {
        let err = service
            .change_status(&stranger, post_id, next)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id, .. } if id == post_id));
    }

    let stored = service.get(post_id).await.unwrap();
    assert_eq!(stored.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_denied_listing_stays_permission_denied() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());
    let author_id = Uuid::new_v4();
    let author = Actor::authenticated(author_id, Role::User);
    store.seed(published_post(author_id)).await;
    store.deny_reads.store(true, Ordering::SeqCst);

    assert!(service.list_published().await.unwrap_err().is_permission_denied());
    assert!(service.list_by_author(&author).await.unwrap_err().is_permission_denied());
}

#[tokio::test]
async fn test_guest_cannot_create() {
    let store = Arc::new(FakeStore::default());
    let service = PostService::new(store.clone());

    let err = service
        .create(&Actor::guest(), "t".to_string(), "c".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAuthenticated));
}
