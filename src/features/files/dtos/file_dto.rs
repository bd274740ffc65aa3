use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::{FileRecord, Modifier};

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for a catalog record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    /// Path relative to the shared folder root
    pub file_name: String,
    /// Size of the file in bytes
    pub file_size: i64,
    /// Lowercase extension without the dot
    pub file_type: String,
    pub team_id: Option<Uuid>,
    pub uploaded_by: Option<String>,
    /// Last modifier; `external` when the last change happened outside the application
    pub modified_by: Modifier,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponseDto {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name,
            file_size: record.file_size,
            file_type: record.file_type,
            team_id: record.team_id,
            uploaded_by: record.uploaded_by,
            modified_by: record.modifier,
            last_modified_at: record.last_modified_at,
            access_count: record.access_count,
            created_at: record.created_at,
        }
    }
}

/// Metadata patch. Only team assignment is writable.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFileDto {
    /// New owning team; `null` unassigns the file
    pub team_id: Option<Uuid>,
}

/// Query for the hot files ranking
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct HotFilesQuery {
    /// Minimum access count to be listed (default: 1)
    #[serde(default = "default_min_access")]
    #[validate(range(min = 0, message = "min_access must not be negative"))]
    pub min_access: i64,

    /// Maximum number of files returned (default: 10, max: 100)
    #[serde(default = "default_hot_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
}

fn default_min_access() -> i64 {
    1
}

fn default_hot_limit() -> i64 {
    10
}

/// Response DTO for an access event
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessCountDto {
    pub id: Uuid,
    pub access_count: i64,
}

/// Text content of an editable file
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileContentDto {
    pub file_name: String,
    pub content: String,
    /// Size on disk in bytes
    pub size: u64,
}

/// Request DTO for saving edited content
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveContentDto {
    pub content: String,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Confirmation that the file was deleted
    pub deleted: bool,
}
