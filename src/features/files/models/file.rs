use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Who last changed a file.
///
/// `External` is a meaningful state: the most recent change was made outside the
/// application (detected by reconciliation), and any earlier attribution is void.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum Modifier {
    /// Changed through the application by this user
    Attributed(String),
    /// Changed by a process outside the application
    External,
}

impl Modifier {
    /// Decode the nullable `modified_by` column
    pub fn from_column(value: Option<String>) -> Self {
        match value {
            Some(user) => Modifier::Attributed(user),
            None => Modifier::External,
        }
    }

    /// Encode into the nullable `modified_by` column
    pub fn to_column(&self) -> Option<&str> {
        match self {
            Modifier::Attributed(user) => Some(user.as_str()),
            Modifier::External => None,
        }
    }
}

/// A tracked file in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: Uuid,
    /// Path relative to the shared folder root, original casing, `/` separated
    pub file_name: String,
    pub file_size: i64,
    /// Lowercase extension without the dot, derived from `file_name`
    pub file_type: String,
    /// Owning team; `None` until someone assigns the file
    pub team_id: Option<Uuid>,
    pub uploaded_by: Option<String>,
    pub modifier: Modifier,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of `file_records`
#[derive(Debug, FromRow)]
pub struct FileRecordRow {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub team_id: Option<Uuid>,
    pub uploaded_by: Option<String>,
    pub modified_by: Option<String>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileRecordRow> for FileRecord {
    fn from(row: FileRecordRow) -> Self {
        Self {
            id: row.id,
            file_name: row.file_name,
            file_size: row.file_size,
            file_type: row.file_type,
            team_id: row.team_id,
            uploaded_by: row.uploaded_by,
            modifier: Modifier::from_column(row.modified_by),
            last_modified_at: row.last_modified_at,
            access_count: row.access_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Data for creating a new catalog record
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub file_name: String,
    pub file_size: i64,
    pub team_id: Option<Uuid>,
    pub uploaded_by: Option<String>,
    pub modifier: Modifier,
    pub last_modified_at: DateTime<Utc>,
}

impl NewFileRecord {
    /// A file found on disk that the catalog did not know about.
    /// Nobody uploaded it, nobody in the application changed it, and it has no team yet.
    pub fn discovered(file_name: String, file_size: i64, modified: DateTime<Utc>) -> Self {
        Self {
            file_name,
            file_size,
            team_id: None,
            uploaded_by: None,
            modifier: Modifier::External,
            last_modified_at: modified,
        }
    }

    /// A file uploaded through the application by `user` on behalf of `team_id`
    pub fn uploaded(
        file_name: String,
        file_size: i64,
        team_id: Uuid,
        user: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            file_name,
            file_size,
            team_id: Some(team_id),
            uploaded_by: Some(user.to_string()),
            modifier: Modifier::Attributed(user.to_string()),
            last_modified_at: now,
        }
    }

    pub fn file_type(&self) -> String {
        file_type_of(&self.file_name)
    }
}

/// Partial update of a record. Fields left as `None` are not written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRecordPatch {
    pub file_size: Option<i64>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub modifier: Option<Modifier>,
    /// `Some(None)` clears the team
    pub team_id: Option<Option<Uuid>>,
}

impl FileRecordPatch {
    /// The disk copy changed behind the application's back
    pub fn external_change(file_size: i64, modified: DateTime<Utc>) -> Self {
        Self {
            file_size: Some(file_size),
            last_modified_at: Some(modified),
            modifier: Some(Modifier::External),
            team_id: None,
        }
    }

    /// Content written through the application by `user`
    pub fn content_saved(file_size: i64, user: &str, now: DateTime<Utc>) -> Self {
        Self {
            file_size: Some(file_size),
            last_modified_at: Some(now),
            modifier: Some(Modifier::Attributed(user.to_string())),
            team_id: None,
        }
    }

    /// Team (re)assignment performed by `user`
    pub fn team_assigned(team_id: Option<Uuid>, user: &str, now: DateTime<Utc>) -> Self {
        Self {
            file_size: None,
            last_modified_at: Some(now),
            modifier: Some(Modifier::Attributed(user.to_string())),
            team_id: Some(team_id),
        }
    }

    /// Apply the set fields to an in-memory record
    #[cfg(test)]
    pub fn apply_to(&self, record: &mut FileRecord) {
        if let Some(size) = self.file_size {
            record.file_size = size;
        }
        if let Some(modified) = self.last_modified_at {
            record.last_modified_at = Some(modified);
        }
        if let Some(modifier) = &self.modifier {
            record.modifier = modifier.clone();
        }
        if let Some(team) = self.team_id {
            record.team_id = team;
        }
    }
}

/// Lowercase extension of the last path segment, without the dot.
///
/// Dot-files without a further extension (`.env`) have no type.
pub fn file_type_of(file_name: &str) -> String {
    let segment = file_name.rsplit('/').next().unwrap_or(file_name);
    match segment.rfind('.') {
        Some(idx) if idx > 0 => segment[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}
