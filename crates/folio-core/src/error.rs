//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    /// A status value outside `draft`, `review`, `published`, `archived`.
    #[error("Unknown post status: {0:?}")]
    UnknownStatus(String),

    #[error("Unknown role: {0:?}")]
    UnknownRole(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Short message suitable for showing next to a reverted control.
    ///
    /// Permission problems get their own wording so users can tell them
    /// apart from transient failures.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "Please sign in to continue.",
            Self::PermissionDenied(_) => "You don't have permission to do that.",
            Self::NotFound { .. } => "This post no longer exists. Refresh the page.",
            Self::UnknownStatus(_) | Self::UnknownRole(_) | Self::Validation(_) => {
                "The request was not valid."
            }
            Self::Duplicate(_) => "That already exists.",
            Self::Internal(_) => "Something went wrong. Please try again.",
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The store refused the operation for the current credentials.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A write referenced a row that is not there, other than the target entity.
    #[error("Missing reference: {0}")]
    MissingReference(String),
}

impl RepoError {
    /// Classify a store failure against the entity it was about.
    pub fn into_domain(self, entity_type: &'static str, id: Uuid) -> DomainError {
        match self {
            RepoError::NotFound => DomainError::NotFound { entity_type, id },
            RepoError::PermissionDenied(msg) => DomainError::PermissionDenied(msg),
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::MissingReference(msg) => DomainError::Validation(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }

    /// Classify a failure of a query that spans many rows.
    ///
    /// There is no single entity to blame, so `NotFound` is a store fault here.
    pub fn into_domain_query(self) -> DomainError {
        match self {
            RepoError::NotFound => DomainError::Internal("Query target missing".to_string()),
            RepoError::PermissionDenied(msg) => DomainError::PermissionDenied(msg),
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::MissingReference(msg) => DomainError::Validation(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_classification() {
        let id = Uuid::new_v4();

        let err = RepoError::PermissionDenied("rule".to_string()).into_domain("Post", id);
        assert!(err.is_permission_denied());

        let err = RepoError::NotFound.into_domain("Post", id);
        assert!(matches!(err, DomainError::NotFound { entity_type: "Post", id: got } if got == id));

        let err = RepoError::Query("boom".to_string()).into_domain("Post", id);
        assert!(matches!(err, DomainError::Internal(_)));

        let err = RepoError::MissingReference("user gone".to_string()).into_domain("Post", id);
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_query_errors_keep_their_kind() {
        let err = RepoError::PermissionDenied("row policy".to_string()).into_domain_query();
        assert!(err.is_permission_denied());

        let err = RepoError::NotFound.into_domain_query();
        assert!(matches!(err, DomainError::Internal(_)));

        let err = RepoError::Connection("refused".to_string()).into_domain_query();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn test_permission_message_differs_from_generic() {
        let denied = DomainError::PermissionDenied("rule".to_string());
        let generic = DomainError::Internal("boom".to_string());
        assert_ne!(denied.user_message(), generic.user_message());
    }
}
