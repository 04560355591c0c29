use uuid::Uuid;

use super::{Post, Role};
use crate::error::DomainError;

/// The party performing an operation, as reported by authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<Uuid>,
    pub role: Role,
}

impl Actor {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            role: Role::Guest,
        }
    }

    pub fn authenticated(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id: Some(user_id),
            role,
        }
    }

    pub fn is_author_of(&self, post: &Post) -> bool {
        self.user_id == Some(post.author_id)
    }

    pub fn require_user_id(&self) -> Result<Uuid, DomainError> {
        self.user_id.ok_or(DomainError::NotAuthenticated)
    }
}
