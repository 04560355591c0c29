//! Background jobs.

mod reconcile;
mod scheduler;

pub use scheduler::{BackgroundJobs, SchedulerConfig};
