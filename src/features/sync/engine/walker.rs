//! Recursive enumeration of the regular files under the shared folder root.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use super::path::normalize;
use crate::features::sync::error::SyncError;
use crate::shared::clock::Clock;

/// A regular file found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct DiskEntry {
    /// Normalized path relative to the root, original casing
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub size: u64,
    /// Modification instant in UTC
    pub modified: DateTime<Utc>,
}

/// Lazily walk `root` depth-first in file name order.
///
/// Directories are traversed but not yielded. Symbolic links are neither
/// followed nor yielded. Entries that cannot be read or stat'd come out as
/// [`SyncError::Stat`] carrying the root-relative path (empty for the root
/// itself) so the caller can log and skip them.
pub fn walk<'a>(
    root: &'a Path,
    clock: &'a dyn Clock,
) -> impl Iterator<Item = Result<DiskEntry, SyncError>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| normalize(p, root)).unwrap_or_default();
                    return Some(Err(SyncError::Stat {
                        path,
                        message: e.to_string(),
                    }));
                }
            };

            if !entry.file_type().is_file() {
                return None;
            }

            let stat = entry
                .metadata()
                .map_err(|e| e.to_string())
                .and_then(|m| m.modified().map(|t| (m.len(), t)).map_err(|e| e.to_string()));
            let (size, modified) = match stat {
                Ok(stat) => stat,
                Err(message) => {
                    return Some(Err(SyncError::Stat {
                        path: normalize(entry.path(), root),
                        message,
                    }))
                }
            };

            let absolute_path = entry.into_path();
            Some(Ok(DiskEntry {
                relative_path: normalize(&absolute_path, root),
                absolute_path,
                size,
                modified: clock.to_canonical(modified),
            }))
        })
}

/// Collect every readable entry, logging and reporting the ones that failed
pub fn scan(root: &Path, clock: &dyn Clock) -> (Vec<DiskEntry>, Vec<SyncError>) {
    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for result in walk(root, clock) {
        match result {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                failures.push(e);
            }
        }
    }

    (entries, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::SystemClock;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_walk_yields_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Team A/empty")).unwrap();
        fs::write(dir.path().join("Team A/Report.TXT"), b"hello").unwrap();
        fs::write(dir.path().join("root.md"), b"# x").unwrap();

        let entries: Vec<DiskEntry> = walk(dir.path(), &SystemClock)
            .collect::<Result<_, _>>()
            .unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();

        assert_eq!(names, vec!["Team A/Report.TXT", "root.md"]);
        assert_eq!(entries[0].size, 5);
        assert_eq!(entries[0].absolute_path, dir.path().join("Team A/Report.TXT"));
    }

    #[test]
    fn test_walk_reports_mtime_in_utc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"x").unwrap();
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        let entry = walk(dir.path(), &SystemClock).next().unwrap().unwrap();

        assert_eq!(entry.modified.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_walk_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();

        assert_eq!(walk(dir.path(), &SystemClock).count(), 1);
        assert_eq!(walk(dir.path(), &SystemClock).count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_symlinks() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), b"x").unwrap();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("alias.txt"))
            .unwrap();
        // A cycle would hang a walker that follows links
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let (entries, failures) = scan(dir.path(), &SystemClock);
        let names: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();

        assert_eq!(names, vec!["a.txt"]);
        assert!(failures.is_empty());
    }
}
