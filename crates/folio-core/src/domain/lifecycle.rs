//! Post lifecycle rules.
//!
//! Given who is acting (role and authorship) and where a post currently is,
//! these functions decide which statuses the actor may move it to. They are
//! pure: nothing is cached and nothing is written. Persisting a chosen
//! status is up to the caller.
//!
//! | role            | draft            | review           | published | archived |
//! |-----------------|------------------|------------------|-----------|----------|
//! | admin           | all              | all              | all       | all      |
//! | user, author    | draft, review    | draft, review    | published | archived |
//! | user, other     | current only     | current only     | current   | current  |
//! | guest           | current only     | current only     | current   | current  |

use serde::Serialize;

use super::{PostStatus, Role};
use crate::error::DomainError;

/// What an actor can do with a post's status right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOptions {
    pub current: PostStatus,
    /// Allowed statuses in canonical order, always including `current`.
    pub allowed: Vec<PostStatus>,
    pub help: Option<&'static str>,
}

impl StatusOptions {
    pub fn can_change(&self) -> bool {
        self.allowed.len() > 1
    }
}

fn admin_targets(current: PostStatus) -> &'static [PostStatus] {
    match current {
        PostStatus::Draft | PostStatus::Review | PostStatus::Published | PostStatus::Archived => {
            &PostStatus::ALL
        }
    }
}

fn author_targets(current: PostStatus) -> &'static [PostStatus] {
    match current {
        PostStatus::Draft => &[PostStatus::Draft, PostStatus::Review],
        PostStatus::Review => &[PostStatus::Draft, PostStatus::Review],
        PostStatus::Published => &[PostStatus::Published],
        PostStatus::Archived => &[PostStatus::Archived],
    }
}

fn targets(role: Role, current: PostStatus, is_author: bool) -> &'static [PostStatus] {
    match (role, is_author) {
        (Role::Admin, _) => admin_targets(current),
        (Role::User, true) => author_targets(current),
        (Role::User, false) | (Role::Guest, _) => &[],
    }
}

/// Statuses `role` may set a post to, in canonical order.
///
/// The current status is always part of the result so that "leave it as it
/// is" can be offered.
pub fn allowed_statuses(role: Role, current: PostStatus, is_author: bool) -> Vec<PostStatus> {
    let targets = targets(role, current, is_author);
    let mut allowed: Vec<PostStatus> = PostStatus::ALL
        .into_iter()
        .filter(|s| *s == current || targets.contains(s))
        .collect();

    if !allowed.contains(&current) {
        allowed.push(current);
    }
    allowed
}

/// Guidance shown next to the status picker.
pub fn help_text(role: Role, current: PostStatus) -> Option<&'static str> {
    match (role, current) {
        (Role::Admin, PostStatus::Draft) => Some(
            "Drafts are hidden from readers. Publish to make this post live or send it to review first.",
        ),
        (Role::Admin, PostStatus::Review) => Some(
            "This post is waiting for review. Publish it or return it to draft for more changes.",
        ),
        (Role::Admin, PostStatus::Published) => Some(
            "This post is live. Archive it to hide it from the blog without deleting it.",
        ),
        (Role::Admin, PostStatus::Archived) => Some(
            "Archived posts are hidden from readers. Publish again or move back to draft to restore.",
        ),
        (Role::User, PostStatus::Draft) => Some(
            "Submit this post for review when it is ready. An administrator will publish it.",
        ),
        (Role::User, PostStatus::Review) => Some(
            "This post is waiting for an administrator. Move it back to draft to keep editing.",
        ),
        (Role::User, PostStatus::Published) => Some(
            "This post has been published. Contact an administrator to change its status.",
        ),
        (Role::User, PostStatus::Archived) | (Role::Guest, _) => None,
    }
}

pub fn status_options(role: Role, current: PostStatus, is_author: bool) -> StatusOptions {
    StatusOptions {
        current,
        allowed: allowed_statuses(role, current, is_author),
        help: help_text(role, current),
    }
}

/// Same as [`status_options`] for a status that has not been parsed yet.
pub fn status_options_for(
    role: Role,
    current: &str,
    is_author: bool,
) -> Result<StatusOptions, DomainError> {
    let current: PostStatus = current.parse()?;
    Ok(status_options(role, current, is_author))
}

/// Fails with `PermissionDenied` unless `next` is reachable from `current`.
pub fn check_transition(
    role: Role,
    current: PostStatus,
    next: PostStatus,
    is_author: bool,
) -> Result<(), DomainError> {
    if allowed_statuses(role, current, is_author).contains(&next) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied(format!(
            "{role} cannot move a post from {current} to {next}"
        )))
    }
}
