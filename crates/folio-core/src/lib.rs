//! # Folio Core
//!
//! The domain layer of the Folio blog backend.
//! This crate contains the post lifecycle rules, the like synchronization
//! engine and the ports they talk through. It performs no I/O of its own.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{LikeEngine, PostService, SyncReport};
