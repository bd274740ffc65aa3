//! Reconciliation of the file catalog against the shared folder on disk.
//!
//! A run loads the whole catalog and walks the whole tree, matches the two by
//! case-folded relative path, then creates, updates and deletes records so the
//! catalog reflects the disk. Disk wins on size and modification time once the
//! difference exceeds the skew tolerance.

mod lock;
mod path;
mod plan;
mod walker;

pub use lock::SyncLocks;
pub use path::match_key;

use plan::{plan, Plan};
use walker::{scan, DiskEntry};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::core::error::AppError;
use crate::features::files::models::{FileRecordPatch, NewFileRecord};
use crate::features::files::repository::FileRepository;
use crate::features::sync::error::{SyncError, SyncFailure};
use crate::shared::clock::Clock;

/// Parameters of one reconciliation run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub root: PathBuf,
    /// Catalogue files found on disk that have no record
    pub create_missing: bool,
    /// Classify and count without mutating the catalog
    pub dry_run: bool,
    /// Disk timestamps within this window of the stored one are not changes
    pub skew_tolerance: Duration,
}

/// Outcome of a run.
///
/// In a dry run the counters describe what would have happened.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
    /// Files on disk left without a record because creation was not requested
    pub untracked: u64,
    pub dry_run: bool,
    pub failures: Vec<SyncFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Walks a root into readable entries and the paths that could not be read
type Scanner = fn(&Path, &dyn Clock) -> (Vec<DiskEntry>, Vec<SyncError>);

/// Applies disk state to the catalog
pub struct Reconciler {
    repository: Arc<dyn FileRepository>,
    clock: Arc<dyn Clock>,
    locks: Arc<SyncLocks>,
    scanner: Scanner,
}

impl Reconciler {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        clock: Arc<dyn Clock>,
        locks: Arc<SyncLocks>,
    ) -> Self {
        Self {
            repository,
            clock,
            locks,
            scanner: scan,
        }
    }

    #[cfg(test)]
    fn with_scanner(mut self, scanner: Scanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Run one reconciliation.
    ///
    /// Fails with [`SyncError::Configuration`] before touching the catalog when
    /// the root is empty, missing or not a directory. Per-file failures are
    /// logged and returned in the report.
    pub async fn reconcile(&self, options: &SyncOptions) -> Result<SyncReport, SyncError> {
        let root = validate_root(&options.root).await?;
        let tolerance = TimeDelta::from_std(options.skew_tolerance).map_err(|_| {
            SyncError::Configuration("Skew tolerance is out of range".to_string())
        })?;

        let _guard = self.locks.acquire(&root).await;

        let started = Instant::now();
        let started_at = self.clock.now();
        info!(
            "Reconciliation started: root={}, create_missing={}, dry_run={}",
            root.display(),
            options.create_missing,
            options.dry_run
        );

        let scan_root = root.clone();
        let scan_clock = Arc::clone(&self.clock);
        let scanner = self.scanner;
        let (catalog, scanned) = tokio::join!(
            self.repository.list_all(),
            tokio::task::spawn_blocking(move || scanner(&scan_root, scan_clock.as_ref()))
        );
        let catalog = catalog?;
        let (entries, walk_errors) = scanned.map_err(|e| SyncError::Walk(e.to_string()))?;

        let unreadable: HashSet<String> = walk_errors
            .iter()
            .filter_map(|e| match e {
                SyncError::Stat { path, .. } => Some(match_key(path)),
                _ => None,
            })
            .collect();
        let mut failures: Vec<SyncFailure> =
            walk_errors.iter().filter_map(SyncError::to_failure).collect();

        let plan = plan(
            catalog,
            entries,
            &unreadable,
            options.create_missing,
            tolerance,
        );
        let untracked = plan.untracked as u64;

        let (created, updated, deleted) = if options.dry_run {
            (
                plan.creates.len() as u64,
                plan.updates.len() as u64,
                plan.deletes.len() as u64,
            )
        } else {
            self.apply(plan, &mut failures).await
        };

        let report = SyncReport {
            created,
            updated,
            deleted,
            untracked,
            dry_run: options.dry_run,
            failures,
            started_at,
            finished_at: self.clock.now(),
        };

        info!(
            "Reconciliation finished: root={}, created={}, updated={}, deleted={}, untracked={}, failures={}, dry_run={}, elapsed_ms={}",
            root.display(),
            report.created,
            report.updated,
            report.deleted,
            report.untracked,
            report.failures.len(),
            report.dry_run,
            started.elapsed().as_millis()
        );

        Ok(report)
    }

    /// Apply the plan one record at a time: updates, then creates, then deletes.
    /// Failed operations are recorded and not counted.
    async fn apply(&self, plan: Plan, failures: &mut Vec<SyncFailure>) -> (u64, u64, u64) {
        let mut created = 0;
        let mut updated = 0;
        let mut deleted = 0;

        for (record, entry) in plan.updates {
            let patch = FileRecordPatch::external_change(disk_size(entry.size), entry.modified);
            match self.repository.update(record.id, patch).await {
                Ok(_) => {
                    debug!("Record updated from disk: {}", record.file_name);
                    updated += 1;
                }
                Err(source) => self.record_failure(
                    failures,
                    SyncError::RecordUpdate {
                        path: record.file_name,
                        source,
                    },
                ),
            }
        }

        for entry in plan.creates {
            let record = NewFileRecord::discovered(
                entry.relative_path.clone(),
                disk_size(entry.size),
                entry.modified,
            );
            match self.repository.insert(record).await {
                Ok(_) => {
                    debug!("Record created for untracked file: {}", entry.relative_path);
                    created += 1;
                }
                Err(source) => self.record_failure(
                    failures,
                    SyncError::RecordCreation {
                        path: entry.relative_path,
                        source,
                    },
                ),
            }
        }

        for record in plan.deletes {
            match self.repository.delete(record.id).await {
                Ok(()) => {
                    debug!("Record deleted, file is gone: {}", record.file_name);
                    deleted += 1;
                }
                // Removed concurrently; the record is gone either way
                Err(AppError::NotFound(_)) => {
                    debug!("Record already deleted: {}", record.file_name);
                    deleted += 1;
                }
                Err(source) => self.record_failure(
                    failures,
                    SyncError::RecordDeletion {
                        path: record.file_name,
                        source,
                    },
                ),
            }
        }

        (created, updated, deleted)
    }

    fn record_failure(&self, failures: &mut Vec<SyncFailure>, err: SyncError) {
        error!("{}", err);
        if let Some(failure) = err.to_failure() {
            failures.push(failure);
        }
    }
}

async fn validate_root(root: &Path) -> Result<PathBuf, SyncError> {
    if root.as_os_str().is_empty() {
        return Err(SyncError::Configuration(
            "Shared folder path is not set".to_string(),
        ));
    }

    let metadata = tokio::fs::metadata(root).await.map_err(|e| {
        SyncError::Configuration(format!(
            "Shared folder path '{}' is not accessible: {}",
            root.display(),
            e
        ))
    })?;
    if !metadata.is_dir() {
        return Err(SyncError::Configuration(format!(
            "Shared folder path '{}' is not a directory",
            root.display()
        )));
    }

    tokio::fs::canonicalize(root).await.map_err(|e| {
        SyncError::Configuration(format!(
            "Cannot resolve shared folder path '{}': {}",
            root.display(),
            e
        ))
    })
}

fn disk_size(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::models::{file_type_of, FileRecord, Modifier};
    use crate::features::files::repository::InMemoryFileRepository;
    use crate::features::sync::error::FailureKind;
    use crate::shared::clock::FixedClock;
    use chrono::TimeZone;
    use std::fs;
    use std::time::UNIX_EPOCH;
    use uuid::Uuid;

    const T0_SECS: i64 = 1_704_877_200; // 2024-01-10T09:00:00Z

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(T0_SECS, 0).unwrap()
    }

    struct Fixture {
        dir: tempfile::TempDir,
        repo: Arc<InMemoryFileRepository>,
        reconciler: Reconciler,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(InMemoryFileRepository::new());
        let reconciler = Reconciler::new(
            repo.clone(),
            Arc::new(FixedClock(t0() + TimeDelta::days(1))),
            Arc::new(SyncLocks::new()),
        );
        Fixture {
            dir,
            repo,
            reconciler,
        }
    }

    impl Fixture {
        fn options(&self, create_missing: bool, dry_run: bool) -> SyncOptions {
            SyncOptions {
                root: self.dir.path().to_path_buf(),
                create_missing,
                dry_run,
                skew_tolerance: Duration::from_secs(2),
            }
        }

        /// Write a file whose mtime is `offset_secs` after T0
        fn write(&self, name: &str, content: &[u8], offset_secs: i64) {
            let path = self.dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            let mtime = UNIX_EPOCH + Duration::from_secs((T0_SECS + offset_secs) as u64);
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(mtime)
                .unwrap();
        }

        fn seed(&self, name: &str, modified: Option<DateTime<Utc>>, modifier: Modifier) -> Uuid {
            let id = Uuid::new_v4();
            self.repo.seed(FileRecord {
                id,
                file_name: name.to_string(),
                file_size: 1,
                file_type: file_type_of(name),
                team_id: Some(Uuid::nil()),
                uploaded_by: Some("ana".to_string()),
                modifier,
                last_modified_at: modified,
                access_count: 7,
                created_at: t0(),
                updated_at: t0(),
            });
            id
        }
    }

    fn counts(report: &SyncReport) -> (u64, u64, u64) {
        (report.created, report.updated, report.deleted)
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let f = fixture();
        f.write("a.txt", b"a", 0);
        f.write("docs/b.md", b"b", 0);
        f.seed("gone.txt", Some(t0()), Modifier::External);

        let first = f.reconciler.reconcile(&f.options(true, false)).await.unwrap();
        let second = f.reconciler.reconcile(&f.options(true, false)).await.unwrap();

        assert_eq!(counts(&first), (2, 0, 1));
        assert_eq!(counts(&second), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_case_insensitive_match() {
        let f = fixture();
        f.write("report.txt", b"x", 0);
        let id = f.seed("Report.TXT", Some(t0()), Modifier::External);

        let report = f.reconciler.reconcile(&f.options(true, false)).await.unwrap();

        assert_eq!(counts(&report), (0, 0, 0));
        let records = f.repo.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].file_name, "Report.TXT");
    }

    #[tokio::test]
    async fn test_tolerance_window() {
        let f = fixture();
        f.write("within.txt", b"x", 1);
        f.write("beyond.txt", b"xyz", 3);
        f.seed("within.txt", Some(t0()), Modifier::External);
        f.seed("beyond.txt", Some(t0()), Modifier::External);

        let report = f.reconciler.reconcile(&f.options(false, false)).await.unwrap();

        assert_eq!(counts(&report), (0, 1, 0));
        let records = f.repo.snapshot();
        let beyond = records.iter().find(|r| r.file_name == "beyond.txt").unwrap();
        let within = records.iter().find(|r| r.file_name == "within.txt").unwrap();
        assert_eq!(beyond.file_size, 3);
        assert_eq!(beyond.last_modified_at, Some(t0() + TimeDelta::seconds(3)));
        assert_eq!(within.last_modified_at, Some(t0()));
        assert_eq!(within.file_size, 1);
    }

    #[tokio::test]
    async fn test_missing_stored_instant_is_updated() {
        let f = fixture();
        f.write("a.txt", b"x", 0);
        f.seed("a.txt", None, Modifier::External);

        let report = f.reconciler.reconcile(&f.options(false, false)).await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(f.repo.snapshot()[0].last_modified_at, Some(t0()));
    }

    #[tokio::test]
    async fn test_update_clears_modifier_and_keeps_other_fields() {
        let f = fixture();
        f.write("notes.md", b"edited outside", 60);
        f.seed(
            "notes.md",
            Some(t0()),
            Modifier::Attributed("ana".to_string()),
        );

        f.reconciler.reconcile(&f.options(false, false)).await.unwrap();

        let record = &f.repo.snapshot()[0];
        assert_eq!(record.modifier, Modifier::External);
        assert_eq!(record.uploaded_by.as_deref(), Some("ana"));
        assert_eq!(record.team_id, Some(Uuid::nil()));
        assert_eq!(record.access_count, 7);
    }

    #[tokio::test]
    async fn test_deleted_file_removes_record() {
        let f = fixture();
        f.write("keep.txt", b"x", 0);
        f.seed("keep.txt", Some(t0()), Modifier::External);
        f.seed("removed.txt", Some(t0()), Modifier::External);

        let report = f.reconciler.reconcile(&f.options(false, false)).await.unwrap();

        assert_eq!(counts(&report), (0, 0, 1));
        let names: Vec<String> = f.repo.snapshot().into_iter().map(|r| r.file_name).collect();
        assert_eq!(names, vec!["keep.txt"]);
    }

    #[tokio::test]
    async fn test_creation_gating() {
        let f = fixture();
        f.write("Inbox/Scan.PDF", b"%PDF", 5);

        let gated = f.reconciler.reconcile(&f.options(false, false)).await.unwrap();
        assert_eq!(counts(&gated), (0, 0, 0));
        assert_eq!(gated.untracked, 1);
        assert!(f.repo.snapshot().is_empty());

        let report = f.reconciler.reconcile(&f.options(true, false)).await.unwrap();
        assert_eq!(counts(&report), (1, 0, 0));

        let record = &f.repo.snapshot()[0];
        assert_eq!(record.file_name, "Inbox/Scan.PDF");
        assert_eq!(record.file_type, "pdf");
        assert_eq!(record.file_size, 4);
        assert_eq!(record.modifier, Modifier::External);
        assert_eq!(record.uploaded_by, None);
        assert_eq!(record.team_id, None);
        assert_eq!(record.last_modified_at, Some(t0() + TimeDelta::seconds(5)));
    }

    #[tokio::test]
    async fn test_dry_run_counts_without_mutating() {
        let f = fixture();
        f.write("stale.txt", b"x", 30);
        f.write("untracked.txt", b"x", 0);
        f.seed("stale.txt", Some(t0()), Modifier::Attributed("ana".to_string()));
        f.seed("missing.txt", Some(t0()), Modifier::External);
        let before = f.repo.snapshot();

        let report = f.reconciler.reconcile(&f.options(true, true)).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(counts(&report), (1, 1, 1));
        assert_eq!(f.repo.snapshot(), before);
    }

    #[tokio::test]
    async fn test_missing_root_is_configuration_error() {
        let f = fixture();
        f.seed("a.txt", Some(t0()), Modifier::External);
        let mut options = f.options(true, false);
        options.root = f.dir.path().join("does-not-exist");

        let result = f.reconciler.reconcile(&options).await;

        assert!(matches!(result, Err(SyncError::Configuration(_))));
        assert_eq!(f.repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_root_is_configuration_error() {
        let f = fixture();
        let mut options = f.options(true, false);
        options.root = PathBuf::new();

        let result = f.reconciler.reconcile(&options).await;

        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_root_must_be_directory() {
        let f = fixture();
        f.write("file.txt", b"x", 0);
        let mut options = f.options(true, false);
        options.root = f.dir.path().join("file.txt");

        let result = f.reconciler.reconcile(&options).await;

        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    /// Delegates to the in-memory catalog but refuses to write one name
    struct RejectingRepository {
        inner: InMemoryFileRepository,
        reject: &'static str,
    }

    impl RejectingRepository {
        fn new(reject: &'static str) -> Self {
            Self {
                inner: InMemoryFileRepository::new(),
                reject,
            }
        }

        async fn refuses(&self, id: Uuid) -> bool {
            matches!(
                self.inner.find_by_id(id).await,
                Ok(Some(record)) if record.file_name == self.reject
            )
        }
    }

    #[async_trait::async_trait]
    impl FileRepository for RejectingRepository {
        async fn list_all(&self) -> crate::core::error::Result<Vec<FileRecord>> {
            self.inner.list_all().await
        }
        async fn list_page(
            &self,
            offset: i64,
            limit: i64,
        ) -> crate::core::error::Result<(Vec<FileRecord>, i64)> {
            self.inner.list_page(offset, limit).await
        }
        async fn list_hot(
            &self,
            min_access: i64,
            limit: i64,
        ) -> crate::core::error::Result<Vec<FileRecord>> {
            self.inner.list_hot(min_access, limit).await
        }
        async fn find_by_id(&self, id: Uuid) -> crate::core::error::Result<Option<FileRecord>> {
            self.inner.find_by_id(id).await
        }
        async fn insert(&self, record: NewFileRecord) -> crate::core::error::Result<FileRecord> {
            if record.file_name == self.reject {
                return Err(AppError::Internal("disk full".to_string()));
            }
            self.inner.insert(record).await
        }
        async fn update(
            &self,
            id: Uuid,
            patch: FileRecordPatch,
        ) -> crate::core::error::Result<FileRecord> {
            if self.refuses(id).await {
                return Err(AppError::Internal("row locked".to_string()));
            }
            self.inner.update(id, patch).await
        }
        async fn delete(&self, id: Uuid) -> crate::core::error::Result<()> {
            if self.refuses(id).await {
                return Err(AppError::Internal("row locked".to_string()));
            }
            self.inner.delete(id).await
        }
        async fn increment_access(&self, id: Uuid) -> crate::core::error::Result<i64> {
            self.inner.increment_access(id).await
        }
    }

    #[tokio::test]
    async fn test_creation_failure_is_isolated() {
        let f = fixture();
        f.write("a.txt", b"x", 0);
        f.write("b.txt", b"x", 0);
        f.write("c.txt", b"x", 0);
        let repo = Arc::new(RejectingRepository::new("b.txt"));
        let reconciler = Reconciler::new(
            repo.clone(),
            Arc::new(FixedClock(t0())),
            Arc::new(SyncLocks::new()),
        );

        let report = reconciler.reconcile(&f.options(true, false)).await.unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "b.txt");
        assert_eq!(report.failures[0].kind, FailureKind::RecordCreation);
        let names: Vec<String> = repo
            .inner
            .snapshot()
            .into_iter()
            .map(|r| r.file_name)
            .collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
    }

    fn seed_into(repo: &InMemoryFileRepository, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        repo.seed(FileRecord {
            id,
            file_name: name.to_string(),
            file_size: 1,
            file_type: file_type_of(name),
            team_id: None,
            uploaded_by: None,
            modifier: Modifier::Attributed("ana".to_string()),
            last_modified_at: Some(t0()),
            access_count: 0,
            created_at: t0(),
            updated_at: t0(),
        });
        id
    }

    #[tokio::test]
    async fn test_update_failure_is_isolated() {
        let f = fixture();
        f.write("a.txt", b"aaa", 10);
        f.write("b.txt", b"bbb", 10);
        let repo = Arc::new(RejectingRepository::new("b.txt"));
        seed_into(&repo.inner, "a.txt");
        let rejected = seed_into(&repo.inner, "b.txt");
        seed_into(&repo.inner, "gone.txt");
        let reconciler = Reconciler::new(
            repo.clone(),
            Arc::new(FixedClock(t0())),
            Arc::new(SyncLocks::new()),
        );

        let report = reconciler.reconcile(&f.options(false, false)).await.unwrap();

        assert_eq!(counts(&report), (0, 1, 1));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "b.txt");
        assert_eq!(report.failures[0].kind, FailureKind::RecordUpdate);
        let records = repo.inner.snapshot();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_size, 3);
        assert_eq!(records[0].modifier, Modifier::External);
        assert_eq!(records[1].id, rejected);
        assert_eq!(records[1].file_size, 1);
    }

    #[tokio::test]
    async fn test_deletion_failure_is_isolated() {
        let f = fixture();
        f.write("kept.txt", b"x", 0);
        let repo = Arc::new(RejectingRepository::new("b.txt"));
        seed_into(&repo.inner, "a.txt");
        seed_into(&repo.inner, "b.txt");
        seed_into(&repo.inner, "c.txt");
        let reconciler = Reconciler::new(
            repo.clone(),
            Arc::new(FixedClock(t0())),
            Arc::new(SyncLocks::new()),
        );

        let report = reconciler.reconcile(&f.options(true, false)).await.unwrap();

        assert_eq!(counts(&report), (1, 0, 2));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "b.txt");
        assert_eq!(report.failures[0].kind, FailureKind::RecordDeletion);
        let names: Vec<String> = repo
            .inner
            .snapshot()
            .into_iter()
            .map(|r| r.file_name)
            .collect();
        assert_eq!(names, vec!["b.txt", "kept.txt"]);
    }

    /// Reads the tree normally but reports `docs` as unreadable and hides its files
    fn scan_with_unreadable_docs(
        root: &Path,
        clock: &dyn Clock,
    ) -> (Vec<DiskEntry>, Vec<SyncError>) {
        let (entries, mut failures) = scan(root, clock);
        failures.push(SyncError::Stat {
            path: "docs".to_string(),
            message: "Permission denied (os error 13)".to_string(),
        });
        let entries = entries
            .into_iter()
            .filter(|e| !e.relative_path.starts_with("docs/"))
            .collect();
        (entries, failures)
    }

    #[tokio::test]
    async fn test_unreadable_directory_protects_its_records() {
        let f = fixture();
        f.write("a.txt", b"aaa", 10);
        f.write("docs/b.txt", b"bbb", 10);
        f.seed("a.txt", Some(t0()), Modifier::External);
        let hidden = f.seed("Docs/B.txt", Some(t0()), Modifier::Attributed("ana".into()));
        let missing = f.seed("docs/c.txt", Some(t0()), Modifier::External);
        f.seed("gone.txt", Some(t0()), Modifier::External);
        let reconciler = Reconciler::new(
            f.repo.clone(),
            Arc::new(FixedClock(t0())),
            Arc::new(SyncLocks::new()),
        )
        .with_scanner(scan_with_unreadable_docs);

        let report = reconciler.reconcile(&f.options(true, false)).await.unwrap();

        assert_eq!(counts(&report), (0, 1, 1));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "docs");
        assert_eq!(report.failures[0].kind, FailureKind::Stat);
        let records = f.repo.snapshot();
        let hidden = records.iter().find(|r| r.id == hidden).unwrap();
        assert_eq!(hidden.file_size, 1);
        assert_eq!(hidden.modifier, Modifier::Attributed("ana".to_string()));
        assert!(records.iter().any(|r| r.id == missing));
        assert!(records.iter().all(|r| r.file_name != "gone.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_files_are_not_catalogued() {
        let f = fixture();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("elsewhere.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("elsewhere.txt"),
            f.dir.path().join("link.txt"),
        )
        .unwrap();

        let report = f.reconciler.reconcile(&f.options(true, false)).await.unwrap();

        assert_eq!(report.created, 0);
        assert!(f.repo.snapshot().is_empty());
    }
}
