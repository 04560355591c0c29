//! SeaORM entities.

pub mod post;
pub mod post_like;
pub mod user;
