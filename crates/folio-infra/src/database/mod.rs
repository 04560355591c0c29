//! PostgreSQL persistence.

mod connections;
pub mod entity;
mod errors;
mod postgres_base;
mod postgres_repo;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{PostgresLikeRepository, PostgresPostRepository, PostgresUserRepository};
