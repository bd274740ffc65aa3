use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::SharedFolderConfig;
use crate::features::sync::engine::{Reconciler, SyncOptions, SyncReport};
use crate::features::sync::error::SyncError;

/// Entry point for reconciling the configured shared folder
pub struct SyncService {
    reconciler: Arc<Reconciler>,
    config: SharedFolderConfig,
}

impl SyncService {
    pub fn new(reconciler: Arc<Reconciler>, config: SharedFolderConfig) -> Self {
        Self { reconciler, config }
    }

    /// Reconcile the configured root
    pub async fn run(&self, create_missing: bool, dry_run: bool) -> Result<SyncReport, SyncError> {
        let options = SyncOptions {
            // An unset root fails validation as a configuration error
            root: self.config.root.clone().unwrap_or_else(PathBuf::new),
            create_missing,
            dry_run,
            skew_tolerance: self.config.skew_tolerance,
        };

        self.reconciler.reconcile(&options).await
    }

    /// Reconcile with the scheduled-run settings
    pub async fn run_scheduled(&self) -> Result<SyncReport, SyncError> {
        self.run(self.config.sync_create_missing, false).await
    }
}
