use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::features::sync::services::SyncService;

/// Background worker that reconciles the shared folder on a fixed period
pub struct SyncWorker {
    sync_service: Arc<SyncService>,
    period: Duration,
}

impl SyncWorker {
    pub fn new(sync_service: Arc<SyncService>, period: Duration) -> Self {
        Self {
            sync_service,
            period,
        }
    }

    /// Run the worker in a background loop. Failures are logged; the loop never exits.
    pub async fn run(&self) {
        tracing::info!(
            "Starting shared folder sync worker (every {}s)",
            self.period.as_secs()
        );

        let mut interval = interval(self.period);
        // A slow run must not trigger a burst of catch-up runs
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.sync_service.run_scheduled().await {
                Ok(report) if !report.failures.is_empty() => {
                    tracing::warn!(
                        "Scheduled sync completed with {} failed files",
                        report.failures.len()
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Scheduled sync failed: {}", e);
                }
            }
        }
    }
}
