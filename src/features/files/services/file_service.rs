use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::models::{FileRecord, FileRecordPatch, NewFileRecord};
use crate::features::files::repository::FileRepository;
use crate::features::sync::engine::SyncLocks;
use crate::modules::shared_folder::SharedFolder;
use crate::shared::clock::Clock;
use crate::shared::constants::EDITABLE_EXTENSIONS;

/// Service for catalog operations performed through the API.
///
/// Writes that touch the disk or the catalog hold the shared folder's run lock,
/// so they never interleave with a reconciliation of the same root.
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    folder: SharedFolder,
    clock: Arc<dyn Clock>,
    locks: Arc<SyncLocks>,
    max_edit_size: u64,
}

impl FileService {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        folder: SharedFolder,
        clock: Arc<dyn Clock>,
        locks: Arc<SyncLocks>,
        max_edit_size: u64,
    ) -> Self {
        Self {
            repository,
            folder,
            clock,
            locks,
            max_edit_size,
        }
    }

    /// One page of the catalog, newest modified first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<FileRecord>, i64)> {
        self.repository.list_page(offset, limit).await
    }

    /// Most accessed files
    pub async fn list_hot(&self, min_access: i64, limit: i64) -> Result<Vec<FileRecord>> {
        self.repository.list_hot(min_access, limit).await
    }

    pub async fn get(&self, id: Uuid) -> Result<FileRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))
    }

    /// Store an upload in the shared folder and catalog it for the uploader's team
    pub async fn upload(
        &self,
        user: &AuthenticatedUser,
        original_name: &str,
        data: Vec<u8>,
    ) -> Result<FileRecord> {
        let team_id = user.team_id.ok_or_else(|| {
            AppError::Forbidden("User must belong to a team to upload files".to_string())
        })?;

        let _guard = self.lock_folder().await?;
        let stored_name = self
            .folder
            .write_new(original_name, &data, self.clock.as_ref())
            .await?;

        let record = NewFileRecord::uploaded(
            stored_name.clone(),
            data.len() as i64,
            team_id,
            &user.sub,
            self.clock.now(),
        );

        match self.repository.insert(record).await {
            Ok(created) => {
                info!(
                    "File uploaded: id={}, name={}, team={}, size={}",
                    created.id, created.file_name, team_id, created.file_size
                );
                Ok(created)
            }
            Err(e) => {
                // Keep disk and catalog in step
                if let Err(cleanup) = self.folder.remove(&stored_name).await {
                    warn!(
                        "Failed to remove orphaned upload {}: {}",
                        stored_name, cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Assign the file to a team, or unassign it with `None`.
    ///
    /// Admins may do anything. A manager may move a file into their own team
    /// when it is unassigned or already theirs.
    pub async fn assign_team(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<FileRecord> {
        let record = self.get(id).await?;

        let allowed = user.is_admin()
            || (user.manages(team_id) && (record.team_id.is_none() || user.manages(record.team_id)));
        if !allowed {
            return Err(AppError::Forbidden(
                "Only a manager of the team may assign this file".to_string(),
            ));
        }

        let _guard = self.lock_folder().await?;
        let updated = self
            .repository
            .update(
                id,
                FileRecordPatch::team_assigned(team_id, &user.sub, self.clock.now()),
            )
            .await?;

        info!(
            "File team assigned: id={}, team={:?}, by={}",
            id, team_id, user.sub
        );

        Ok(updated)
    }

    /// Remove the backing file, then the record
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let record = self.get(id).await?;

        if !user.manages(record.team_id) {
            return Err(AppError::Forbidden(
                "Only a manager of the file's team may delete this file".to_string(),
            ));
        }

        let _guard = self.lock_folder().await?;
        self.folder.remove(&record.file_name).await?;
        self.repository.delete(id).await?;

        info!(
            "File deleted: id={}, name={}, by={}",
            id, record.file_name, user.sub
        );

        Ok(())
    }

    /// Raw bytes of the backing file
    pub async fn download(&self, id: Uuid) -> Result<(FileRecord, Vec<u8>)> {
        let record = self.get(id).await?;
        let path = self.folder.resolve(&record.file_name)?;
        let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(format!(
                "File '{}' is missing from the shared folder",
                record.file_name
            )),
            _ => AppError::Internal(format!("Failed to read {}: {}", record.file_name, e)),
        })?;
        Ok((record, data))
    }

    /// Text content for the in-browser editor, with its size on disk
    pub async fn read_content(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(FileRecord, String, u64)> {
        let record = self.editable_record(user, id).await?;
        let (content, size) = self
            .folder
            .read_text(&record.file_name, self.max_edit_size)
            .await?;
        Ok((record, content, size))
    }

    /// Overwrite the file with edited text and attribute the change to `user`
    pub async fn save_content(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        content: &str,
    ) -> Result<FileRecord> {
        let record = self.editable_record(user, id).await?;

        if content.len() as u64 > self.max_edit_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Content exceeds the editing limit of {} bytes",
                self.max_edit_size
            )));
        }

        let _guard = self.lock_folder().await?;
        let stat = self.folder.write_text(&record.file_name, content).await?;
        let updated = self
            .repository
            .update(
                id,
                FileRecordPatch::content_saved(stat.size as i64, &user.sub, self.clock.now()),
            )
            .await?;

        debug!(
            "File content saved: id={}, size={}, by={}",
            id, stat.size, user.sub
        );

        Ok(updated)
    }

    /// Wait until no reconciliation is running against the shared folder
    async fn lock_folder(&self) -> Result<OwnedMutexGuard<()>> {
        let root = self.folder.canonical_root().await?;
        Ok(self.locks.acquire(&root).await)
    }

    async fn editable_record(&self, user: &AuthenticatedUser, id: Uuid) -> Result<FileRecord> {
        let record = self.get(id).await?;

        if !(user.is_admin() || user.belongs_to(record.team_id)) {
            return Err(AppError::Forbidden(
                "Only members of the file's team may edit it".to_string(),
            ));
        }

        if !EDITABLE_EXTENSIONS.contains(&record.file_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "File type .{} is not editable in-browser",
                record.file_type
            )));
        }

        Ok(record)
    }
}
