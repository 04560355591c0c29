//! Services - domain operations composed over the ports.

mod likes;
mod posts;

pub use likes::{LikeEngine, SyncReport};
pub use posts::PostService;

#[cfg(test)]
mod tests;
