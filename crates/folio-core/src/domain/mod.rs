//! Domain entities - the core business objects.

mod actor;
mod like;
pub mod lifecycle;
mod post;
mod status;
mod user;

pub use actor::Actor;
pub use like::{Like, LikeAction, LikeSnapshot, PendingToggle};
pub use lifecycle::StatusOptions;
pub use post::Post;
pub use status::{PostStatus, Role};
pub use user::User;
