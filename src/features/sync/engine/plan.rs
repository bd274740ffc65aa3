//! Classification of disk entries against the catalog.
//!
//! Pure: no I/O, no clock. The reconciler applies the resulting [`Plan`].

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use super::path::match_key;
use super::walker::DiskEntry;
use crate::features::files::models::FileRecord;

/// What a run will do to the catalog
#[derive(Debug, Default)]
pub struct Plan {
    /// Disk entries with no record, to be catalogued
    pub creates: Vec<DiskEntry>,
    /// Records whose disk copy is newer than the stored instant
    pub updates: Vec<(FileRecord, DiskEntry)>,
    /// Records with no disk entry
    pub deletes: Vec<FileRecord>,
    /// Disk entries left uncatalogued because creation was not requested
    pub untracked: usize,
}

/// Whether the disk copy is newer than the catalog beyond `tolerance`.
///
/// A record with no stored instant is always stale.
pub fn is_stale(stored: Option<DateTime<Utc>>, disk: DateTime<Utc>, tolerance: TimeDelta) -> bool {
    match stored {
        None => true,
        Some(stored) => match stored.checked_add_signed(tolerance) {
            Some(limit) => disk > limit,
            None => false,
        },
    }
}

/// Match `entries` to `catalog` by case-folded path and classify each pair.
///
/// `unreadable` holds the keys of paths the walk could not stat. Records at or
/// under those paths are left alone, since their disk state is unknown.
pub fn plan(
    catalog: Vec<FileRecord>,
    entries: Vec<DiskEntry>,
    unreadable: &HashSet<String>,
    create_missing: bool,
    tolerance: TimeDelta,
) -> Plan {
    let mut by_key: HashMap<String, FileRecord> = HashMap::with_capacity(catalog.len());
    for record in catalog {
        let key = match_key(&record.file_name);
        if let Some(existing) = by_key.get(&key) {
            warn!(
                "Catalog holds names differing only by case: '{}' and '{}'; ignoring the latter",
                existing.file_name, record.file_name
            );
            continue;
        }
        by_key.insert(key, record);
    }

    let mut plan = Plan::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());

    for entry in entries {
        let key = match_key(&entry.relative_path);
        if !seen.insert(key.clone()) {
            warn!(
                "Disk holds names differing only by case; skipping '{}'",
                entry.relative_path
            );
            continue;
        }

        match by_key.remove(&key) {
            Some(record) => {
                if is_stale(record.last_modified_at, entry.modified, tolerance) {
                    plan.updates.push((record, entry));
                }
            }
            None if create_missing => plan.creates.push(entry),
            None => plan.untracked += 1,
        }
    }

    let mut deletes: Vec<FileRecord> = by_key
        .into_iter()
        .filter(|(key, _)| !is_shadowed(key, unreadable))
        .map(|(_, record)| record)
        .collect();
    deletes.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    plan.deletes = deletes;

    plan
}

fn is_shadowed(key: &str, unreadable: &HashSet<String>) -> bool {
    unreadable.iter().any(|path| {
        path.is_empty() || key == path || key.starts_with(&format!("{}/", path))
    })
}
