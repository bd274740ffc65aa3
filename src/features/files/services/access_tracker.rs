use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::repository::FileRepository;

/// Counts read events per file, used to rank hot files
pub struct AccessTracker {
    repository: Arc<dyn FileRepository>,
}

impl AccessTracker {
    pub fn new(repository: Arc<dyn FileRepository>) -> Self {
        Self { repository }
    }

    /// Record one access and return the new count.
    ///
    /// Fails with `NotFound` when no record has this id.
    pub async fn record_access(&self, id: Uuid) -> Result<i64> {
        let count = self.repository.increment_access(id).await?;
        debug!("File accessed: id={}, access_count={}", id, count);
        Ok(count)
    }
}
