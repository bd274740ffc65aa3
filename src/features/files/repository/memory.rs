use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::FileRepository;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, FileRecordPatch, NewFileRecord};
use crate::features::sync::engine::match_key;

/// Catalog held in process memory
#[derive(Default)]
pub struct InMemoryFileRepository {
    records: Mutex<HashMap<Uuid, FileRecord>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as-is, bypassing the uniqueness check
    pub fn seed(&self, record: FileRecord) {
        self.lock().insert(record.id, record);
    }

    pub fn snapshot(&self) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = self.lock().values().cloned().collect();
        records.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        records
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, FileRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("File {} not found", id))
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn list_all(&self) -> Result<Vec<FileRecord>> {
        Ok(self.snapshot())
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<FileRecord>, i64)> {
        let mut records = self.snapshot();
        records.sort_by(|a, b| b.last_modified_at.cmp(&a.last_modified_at));
        let total = records.len() as i64;
        let page = records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_hot(&self, min_access: i64, limit: i64) -> Result<Vec<FileRecord>> {
        let mut records: Vec<FileRecord> = self
            .snapshot()
            .into_iter()
            .filter(|r| r.access_count >= min_access)
            .collect();
        records.sort_by(|a, b| {
            b.access_count
                .cmp(&a.access_count)
                .then(b.last_modified_at.cmp(&a.last_modified_at))
        });
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let mut records = self.lock();
        let key = match_key(&record.file_name);
        if records.values().any(|r| match_key(&r.file_name) == key)
        {
            return Err(AppError::Conflict(format!(
                "A file named '{}' is already tracked",
                record.file_name
            )));
        }

        let now = Utc::now();
        let stored = FileRecord {
            id: Uuid::now_v7(),
            file_type: record.file_type(),
            file_name: record.file_name,
            file_size: record.file_size,
            team_id: record.team_id,
            uploaded_by: record.uploaded_by,
            modifier: record.modifier,
            last_modified_at: Some(record.last_modified_at),
            access_count: 0,
            created_at: now,
            updated_at: now,
        };
        records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, patch: FileRecordPatch) -> Result<FileRecord> {
        let mut records = self.lock();
        let record = records.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        patch.apply_to(record);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn increment_access(&self, id: Uuid) -> Result<i64> {
        let mut records = self.lock();
        let record = records.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        record.access_count += 1;
        Ok(record.access_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_rejects_case_insensitive_duplicate() {
        let repo = InMemoryFileRepository::new();
        repo.insert(NewFileRecord::discovered("Report.TXT".into(), 1, Utc::now()))
            .await
            .unwrap();

        let result = repo
            .insert(NewFileRecord::discovered("report.txt".into(), 1, Utc::now()))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_uniqueness_uses_reconciliation_key() {
        let repo = InMemoryFileRepository::new();
        repo.insert(NewFileRecord::discovered("Docs/Plan.md".into(), 1, Utc::now()))
            .await
            .unwrap();

        let result = repo
            .insert(NewFileRecord::discovered("./docs/PLAN.md".into(), 1, Utc::now()))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_backslash_name_is_distinct_on_unix() {
        let repo = InMemoryFileRepository::new();
        repo.insert(NewFileRecord::discovered("a/b.txt".into(), 1, Utc::now()))
            .await
            .unwrap();

        let result = repo
            .insert(NewFileRecord::discovered("a\\b.txt".into(), 1, Utc::now()))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_writes_only_patched_fields() {
        let repo = InMemoryFileRepository::new();
        let team = Uuid::new_v4();
        let created = repo
            .insert(NewFileRecord::uploaded("a.txt".into(), 1, team, "ana", Utc::now()))
            .await
            .unwrap();

        let updated = repo
            .update(created.id, FileRecordPatch::external_change(99, Utc::now()))
            .await
            .unwrap();

        assert_eq!(updated.file_size, 99);
        assert_eq!(updated.team_id, Some(team));
        assert_eq!(updated.uploaded_by.as_deref(), Some("ana"));
        assert_eq!(updated.access_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let repo = InMemoryFileRepository::new();
        let id = Uuid::new_v4();

        assert!(matches!(repo.delete(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            repo.increment_access(id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }
}
