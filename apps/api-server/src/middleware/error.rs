//! Error handling middleware - RFC 7807 compliant responses.
//!
//! Every error body carries a machine-readable `code` so clients can tell
//! a permission denial apart from other failures.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use folio_core::{DomainError, RepoError};
use folio_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::UnknownStatus(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => {
                ErrorResponse::bad_request(detail).with_code("bad_request")
            }
            AppError::UnknownStatus(value) => ErrorResponse::bad_request(format!(
                "'{}' is not a post status",
                value
            ))
            .with_code("unknown_status"),
            AppError::Unauthorized => ErrorResponse::unauthorized()
                .with_detail("You need to sign in to do that."),
            AppError::Forbidden(detail) => ErrorResponse::forbidden().with_detail(detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict")
                .with_code("conflict")
                .with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::UnknownStatus(value) => AppError::UnknownStatus(value),
            DomainError::UnknownRole(value) => {
                AppError::BadRequest(format!("'{}' is not a role", value))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::NotAuthenticated => AppError::Unauthorized,
            DomainError::PermissionDenied(msg) => AppError::Forbidden(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::PermissionDenied(msg) => AppError::Forbidden(msg),
            RepoError::MissingReference(msg) => AppError::BadRequest(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::post_not_found(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (DomainError::UnknownStatus("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::PermissionDenied("no".into()), StatusCode::FORBIDDEN),
            (DomainError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_repo_permission_denied_stays_forbidden() {
        let err = AppError::from(RepoError::PermissionDenied("row policy".into()));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = AppError::from(RepoError::MissingReference("fk_post_likes_user".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
