use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::FileRepository;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, FileRecordPatch, FileRecordRow, NewFileRecord};

const COLUMNS: &str = "id, file_name, file_size, file_type, team_id, uploaded_by, modified_by, \
                       last_modified_at, access_count, created_at, updated_at";

/// Catalog stored in the `file_records` table
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("File {} not found", id))
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn list_all(&self) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query_as::<_, FileRecordRow>(&format!(
            "SELECT {} FROM file_records ORDER BY file_name",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load file catalog: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<FileRecord>, i64)> {
        let rows = sqlx::query_as::<_, FileRecordRow>(&format!(
            "SELECT {} FROM file_records \
             ORDER BY last_modified_at DESC NULLS LAST, file_name \
             LIMIT $1 OFFSET $2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM file_records")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(FileRecord::from).collect(), total))
    }

    async fn list_hot(&self, min_access: i64, limit: i64) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query_as::<_, FileRecordRow>(&format!(
            "SELECT {} FROM file_records WHERE access_count >= $1 \
             ORDER BY access_count DESC, last_modified_at DESC NULLS LAST \
             LIMIT $2",
            COLUMNS
        ))
        .bind(min_access)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let row = sqlx::query_as::<_, FileRecordRow>(&format!(
            "SELECT {} FROM file_records WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FileRecord::from))
    }

    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let file_type = record.file_type();
        let row = sqlx::query_as::<_, FileRecordRow>(&format!(
            "INSERT INTO file_records \
             (id, file_name, file_size, file_type, team_id, uploaded_by, modified_by, last_modified_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(&record.file_name)
        .bind(record.file_size)
        .bind(&file_type)
        .bind(record.team_id)
        .bind(&record.uploaded_by)
        .bind(record.modifier.to_column())
        .bind(record.last_modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                format!("A file named '{}' is already tracked", record.file_name),
            ),
            other => AppError::Database(other),
        })?;

        debug!("File record inserted: id={}, name={}", row.id, row.file_name);

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, patch: FileRecordPatch) -> Result<FileRecord> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE file_records SET updated_at = NOW()");

        if let Some(size) = patch.file_size {
            builder.push(", file_size = ").push_bind(size);
        }
        if let Some(modified) = patch.last_modified_at {
            builder.push(", last_modified_at = ").push_bind(modified);
        }
        if let Some(modifier) = &patch.modifier {
            builder
                .push(", modified_by = ")
                .push_bind(modifier.to_column().map(str::to_string));
        }
        if let Some(team) = patch.team_id {
            builder.push(", team_id = ").push_bind(team);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(COLUMNS);

        let row = builder
            .build_query_as::<FileRecordRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }

    async fn increment_access(&self, id: Uuid) -> Result<i64> {
        // Single statement so concurrent readers never lose an increment
        sqlx::query_scalar::<_, i64>(
            "UPDATE file_records SET access_count = access_count + 1 \
             WHERE id = $1 RETURNING access_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }
}
