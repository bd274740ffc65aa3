use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::sync::engine::SyncReport;
use crate::features::sync::error::SyncFailure;

/// Request DTO for triggering a reconciliation
#[derive(Debug, Deserialize, ToSchema)]
pub struct SyncRequestDto {
    /// Catalogue files found on disk that have no record (default: true)
    #[serde(default = "default_create_missing")]
    pub create_missing: bool,
    /// Only count what would change (default: false)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for SyncRequestDto {
    fn default() -> Self {
        Self {
            create_missing: default_create_missing(),
            dry_run: false,
        }
    }
}

fn default_create_missing() -> bool {
    true
}

/// Response DTO for a reconciliation run
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncResponseDto {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
    /// Files left without a record because creation was not requested
    pub untracked: u64,
    pub dry_run: bool,
    /// Files that could not be reconciled
    pub failures: Vec<SyncFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl From<SyncReport> for SyncResponseDto {
    fn from(report: SyncReport) -> Self {
        Self {
            created: report.created,
            updated: report.updated,
            deleted: report.deleted,
            untracked: report.untracked,
            dry_run: report.dry_run,
            duration_ms: (report.finished_at - report.started_at).num_milliseconds(),
            failures: report.failures,
            started_at: report.started_at,
            finished_at: report.finished_at,
        }
    }
}
