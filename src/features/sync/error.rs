use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Failures of a reconciliation run.
///
/// `Configuration`, `Walk` and `Catalog` abort the run. The per-file variants
/// are logged, reported and skipped.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot stat {path}: {message}")]
    Stat { path: String, message: String },

    #[error("Failed to create record for {path}: {source}")]
    RecordCreation {
        path: String,
        #[source]
        source: AppError,
    },

    #[error("Failed to update record for {path}: {source}")]
    RecordUpdate {
        path: String,
        #[source]
        source: AppError,
    },

    #[error("Failed to delete record for {path}: {source}")]
    RecordDeletion {
        path: String,
        #[source]
        source: AppError,
    },

    #[error("Filesystem scan failed: {0}")]
    Walk(String),

    #[error(transparent)]
    Catalog(#[from] AppError),
}

impl SyncError {
    /// Report entry for per-file failures; `None` for fatal errors
    pub fn to_failure(&self) -> Option<SyncFailure> {
        let (path, kind, message) = match self {
            SyncError::Stat { path, message } => (path, FailureKind::Stat, message.clone()),
            SyncError::RecordCreation { path, source } => {
                (path, FailureKind::RecordCreation, source.to_string())
            }
            SyncError::RecordUpdate { path, source } => {
                (path, FailureKind::RecordUpdate, source.to_string())
            }
            SyncError::RecordDeletion { path, source } => {
                (path, FailureKind::RecordDeletion, source.to_string())
            }
            _ => return None,
        };

        Some(SyncFailure {
            path: path.clone(),
            kind,
            message,
        })
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Configuration(msg) => AppError::Configuration(msg),
            SyncError::Catalog(inner) => inner,
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Stat,
    RecordCreation,
    RecordUpdate,
    RecordDeletion,
}

/// One file that could not be reconciled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SyncFailure {
    pub path: String,
    pub kind: FailureKind,
    pub message: String,
}
