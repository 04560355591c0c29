//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{LikeRepository, PostRepository, UserRepository};
use folio_core::{LikeEngine, PostService};
use folio_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use folio_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use folio_infra::database::{
    PostgresLikeRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Where repositories keep their data.
#[derive(Clone)]
pub enum StorageBackend {
    InMemory,
    #[cfg(feature = "postgres")]
    Postgres(Arc<DatabaseConnections>),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<PostService>,
    pub likes: Arc<LikeEngine>,
    pub storage: StorageBackend,
    admin_emails: Arc<Vec<String>>,
}

impl AppState {
    fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn LikeRepository>,
        storage: StorageBackend,
        admin_emails: Vec<String>,
    ) -> Self {
        Self {
            users,
            posts: Arc::new(PostService::new(posts.clone())),
            likes: Arc::new(LikeEngine::new(posts, likes)),
            storage,
            admin_emails: Arc::new(admin_emails),
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(admin_emails: Vec<String>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::from_parts(
            store.clone(),
            store.clone(),
            store,
            StorageBackend::InMemory,
            admin_emails,
        )
    }

    /// Build the application state, falling back to memory when the
    /// database is not configured or unreachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        tracing::info!("Application state initialized (postgres)");
                        return Self::from_parts(
                            Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            Arc::new(PostgresLikeRepository::new(conn.main.clone())),
                            StorageBackend::Postgres(conn),
                            config.admin_emails.clone(),
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(config.admin_emails.clone())
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}
