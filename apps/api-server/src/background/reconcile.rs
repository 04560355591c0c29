//! Periodic repair of denormalized like counters.

use folio_core::{LikeEngine, SyncReport};

/// One reconciliation pass over every post.
pub async fn reconcile_likes(engine: &LikeEngine) -> Option<SyncReport> {
    match engine.sync_all().await {
        Ok(report) => {
            if report.failed > 0 {
                tracing::warn!(
                    synced = report.synced,
                    failed = report.failed,
                    "Like reconciliation finished with failures"
                );
            } else {
                tracing::info!(synced = report.synced, "Like reconciliation finished");
            }
            Some(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "Like reconciliation could not list posts");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use folio_core::domain::{Like, Post};
    use folio_core::ports::{BaseRepository, LikeRepository, PostRepository};
    use folio_infra::InMemoryStore;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_reconcile_repairs_drifted_counters() {
        let store = Arc::new(InMemoryStore::new());
        let post = BaseRepository::<Post, Uuid>::save(
            store.as_ref(),
            Post::new(Uuid::new_v4(), "Drift".into(), String::new()),
        )
        .await
        .unwrap();
        store.insert(Like::new(post.id, Uuid::new_v4())).await.unwrap();
        store.set_likes_count(post.id, 7).await.unwrap();

        let engine = LikeEngine::new(store.clone(), store.clone());
        let report = reconcile_likes(&engine).await.unwrap();

        assert_eq!(report.synced, 1);
        assert_eq!(report.failed, 0);
        let repaired = BaseRepository::<Post, Uuid>::find_by_id(store.as_ref(), post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(repaired.likes_count, 1);
    }
}
