use sea_orm::{DbErr, SqlErr};

use folio_core::error::RepoError;

/// Foreign key from `post_likes` to `posts`, named in the likes migration.
const LIKED_POST_FK: &str = "fk_post_likes_post";

/// Map a SeaORM error onto the repository error kinds the domain understands.
pub(crate) fn classify(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return foreign_key_violation(msg),
        _ => {}
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("permission denied") {
                RepoError::PermissionDenied(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// Only the liked post is the entity the caller asked about; any other
/// dangling key (liking user, post author) is a bad reference.
pub(crate) fn foreign_key_violation(msg: String) -> RepoError {
    if msg.contains(LIKED_POST_FK) {
        RepoError::NotFound
    } else {
        RepoError::MissingReference(msg)
    }
}
