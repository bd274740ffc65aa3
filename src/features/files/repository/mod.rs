//! Persistence seam for the file catalog.
//!
//! The reconciliation engine and the file services only talk to
//! [`FileRepository`]; the Postgres implementation backs the running service.

#[cfg(test)]
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{FileRecord, FileRecordPatch, NewFileRecord};

#[cfg(test)]
pub use memory::InMemoryFileRepository;
pub use postgres::PgFileRepository;

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Every record in the catalog
    async fn list_all(&self) -> Result<Vec<FileRecord>>;

    /// One page of records, most recently modified first, with the total count
    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<FileRecord>, i64)>;

    /// Files with at least `min_access` reads, most accessed first
    async fn list_hot(&self, min_access: i64, limit: i64) -> Result<Vec<FileRecord>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>>;

    /// Fails with `Conflict` when a record with the same case-folded name exists
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;

    /// Write only the fields set in `patch`. Fails with `NotFound` for unknown ids.
    async fn update(&self, id: Uuid, patch: FileRecordPatch) -> Result<FileRecord>;

    /// Fails with `NotFound` for unknown ids
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Atomically bump the access counter and return the new value
    async fn increment_access(&self, id: Uuid) -> Result<i64>;
}
