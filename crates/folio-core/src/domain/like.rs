use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user liking a post. At most one exists per `(post_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: Uuid, user_id: Uuid) -> Self {
        Self {
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Unlike,
}

/// Like state of one post as seen by one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LikeSnapshot {
    pub liked: bool,
    pub count: u64,
}

impl LikeSnapshot {
    pub fn new(liked: bool, count: u64) -> Self {
        Self { liked, count }
    }

    /// The state a toggle is expected to produce.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                count: self.count.saturating_add(1),
            }
        }
    }
}

/// An optimistic toggle that has been shown to the viewer but not yet
/// confirmed by the store.
///
/// ```
/// use folio_core::domain::{LikeAction, LikeSnapshot, PendingToggle};
///
/// let pending = PendingToggle::begin(LikeSnapshot::new(false, 4));
/// assert_eq!(pending.tentative(), LikeSnapshot::new(true, 5));
/// assert_eq!(pending.intent(), LikeAction::Like);
///
/// // The store call failed: go back to exactly what was shown before.
/// assert_eq!(pending.revert(), LikeSnapshot::new(false, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    before: LikeSnapshot,
    tentative: LikeSnapshot,
}

impl PendingToggle {
    pub fn begin(before: LikeSnapshot) -> Self {
        Self {
            before,
            tentative: before.toggled(),
        }
    }

    pub fn tentative(&self) -> LikeSnapshot {
        self.tentative
    }

    pub fn intent(&self) -> LikeAction {
        if self.tentative.liked {
            LikeAction::Like
        } else {
            LikeAction::Unlike
        }
    }

    /// Settle on the store's count once the mutation went through.
    pub fn confirm(self, authoritative_count: u64) -> LikeSnapshot {
        LikeSnapshot {
            liked: self.tentative.liked,
            count: authoritative_count,
        }
    }

    pub fn revert(self) -> LikeSnapshot {
        self.before
    }
}
