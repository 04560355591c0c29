//! Cron scheduling for background jobs.

use std::sync::Arc;

use folio_core::LikeEngine;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use super::reconcile::reconcile_likes;

/// Every fifteen minutes, on the minute. Cron fields include seconds.
pub const DEFAULT_RECONCILE_CRON: &str = "0 */15 * * * *";

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub reconcile_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconcile_cron: DEFAULT_RECONCILE_CRON.to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            reconcile_cron: std::env::var("LIKE_RECONCILE_CRON")
                .unwrap_or(defaults.reconcile_cron),
        }
    }
}

/// Running background jobs. Empty when scheduling is disabled.
pub struct BackgroundJobs {
    scheduler: Option<JobScheduler>,
}

impl BackgroundJobs {
    /// Schedule the like counter resync and start ticking.
    pub async fn start(
        config: &SchedulerConfig,
        likes: Arc<LikeEngine>,
    ) -> Result<Self, JobSchedulerError> {
        if !config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(Self { scheduler: None });
        }

        let scheduler = JobScheduler::new().await?;
        let job = Job::new_async(config.reconcile_cron.as_str(), move |job_id, _scheduler| {
            let likes = likes.clone();
            Box::pin(async move {
                tracing::debug!(%job_id, "Like reconciliation tick");
                reconcile_likes(&likes).await;
            })
        })?;
        let job_id = scheduler.add(job).await?;
        scheduler.start().await?;

        tracing::info!(
            cron = %config.reconcile_cron,
            %job_id,
            "Like reconciliation scheduled"
        );
        Ok(Self {
            scheduler: Some(scheduler),
        })
    }

    pub async fn shutdown(self) -> Result<(), JobSchedulerError> {
        if let Some(mut scheduler) = self.scheduler {
            scheduler.shutdown().await?;
            tracing::info!("Scheduler stopped");
        }
        Ok(())
    }
}
