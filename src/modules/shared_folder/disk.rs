//! Disk-backed shared folder
//!
//! Every path handed to this module is relative to the configured root and
//! is rejected if it could escape it.

use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::AppError;
use crate::shared::clock::Clock;
use crate::shared::validation::sanitize_filename;

/// Size and modification time of a file in the shared folder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskStat {
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Shared folder rooted at the configured path
#[derive(Debug, Clone)]
pub struct SharedFolder {
    root: Option<PathBuf>,
}

impl SharedFolder {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Configured root, or a configuration error when none is set
    pub fn root(&self) -> Result<&Path, AppError> {
        self.root.as_deref().ok_or_else(|| {
            AppError::Configuration("SHARED_FOLDER_PATH is not configured".to_string())
        })
    }

    /// Root with symlinks resolved. Reconciliation runs lock on this path.
    pub async fn canonical_root(&self) -> Result<PathBuf, AppError> {
        let root = self.root()?;
        tokio::fs::canonicalize(root).await.map_err(|e| {
            AppError::Configuration(format!(
                "Cannot resolve shared folder path '{}': {}",
                root.display(),
                e
            ))
        })
    }

    /// Map a catalog-relative name to an absolute path inside the root
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, AppError> {
        let root = self.root()?;
        let candidate = Path::new(relative);

        let mut resolved = root.to_path_buf();
        let mut depth = 0usize;
        for component in candidate.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(AppError::BadRequest(format!(
                        "Path '{}' is outside the shared folder",
                        relative
                    )));
                }
            }
        }

        if depth == 0 {
            return Err(AppError::BadRequest("Path must name a file".to_string()));
        }

        Ok(resolved)
    }

    /// Store an uploaded file under a sanitized name.
    ///
    /// When the name is taken, `_<YYYYmmddHHMMSS>` is inserted before the
    /// extension. Returns the name the file was stored under.
    pub async fn write_new(
        &self,
        original_name: &str,
        data: &[u8],
        clock: &dyn Clock,
    ) -> Result<String, AppError> {
        let safe_name = sanitize_filename(original_name)
            .ok_or_else(|| AppError::Validation("File name is empty after sanitizing".to_string()))?;

        let mut stored_name = safe_name.clone();
        let mut target = self.resolve(&stored_name)?;
        if tokio::fs::try_exists(&target).await.map_err(io_error)? {
            stored_name = with_timestamp_suffix(&safe_name, clock.now());
            target = self.resolve(&stored_name)?;
            if tokio::fs::try_exists(&target).await.map_err(io_error)? {
                return Err(AppError::Conflict(format!(
                    "A file named '{}' already exists",
                    stored_name
                )));
            }
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&target, data).await.map_err(io_error)?;

        info!(
            "Stored upload in shared folder: name={}, size={}",
            stored_name,
            data.len()
        );

        Ok(stored_name)
    }

    /// Read a file as text, returning it with its size on disk.
    /// Bytes that are not valid UTF-8 are decoded as Latin-1.
    pub async fn read_text(&self, relative: &str, max_size: u64) -> Result<(String, u64), AppError> {
        let path = self.resolve(relative)?;
        let metadata = tokio::fs::metadata(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                AppError::NotFound(format!("File '{}' is missing from the shared folder", relative))
            }
            _ => io_error(e),
        })?;

        if metadata.len() > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File is too large to edit ({} bytes, limit {})",
                metadata.len(),
                max_size
            )));
        }

        let bytes = tokio::fs::read(&path).await.map_err(io_error)?;
        let size = bytes.len() as u64;
        Ok((decode_text(bytes), size))
    }

    /// Replace the content of an existing file
    pub async fn write_text(&self, relative: &str, content: &str) -> Result<DiskStat, AppError> {
        let path = self.resolve(relative)?;
        tokio::fs::write(&path, content.as_bytes())
            .await
            .map_err(io_error)?;
        debug!("Saved content: name={}, size={}", relative, content.len());
        self.stat(relative).await
    }

    /// Delete a file. A file that is already gone is not an error.
    pub async fn remove(&self, relative: &str) -> Result<(), AppError> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed file from shared folder: {}", relative);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File already absent from shared folder: {}", relative);
                Ok(())
            }
            Err(e) => Err(io_error(e)),
        }
    }

    pub async fn stat(&self, relative: &str) -> Result<DiskStat, AppError> {
        let path = self.resolve(relative)?;
        let metadata = tokio::fs::metadata(&path).await.map_err(io_error)?;
        let modified = metadata.modified().map_err(io_error)?;
        Ok(DiskStat {
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
        })
    }
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::Internal(format!("Shared folder I/O failed: {}", e))
}

fn with_timestamp_suffix(name: &str, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%d%H%M%S");
    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{}_{}{}", &name[..idx], stamp, &name[idx..]),
        _ => format!("{}_{}", name, stamp),
    }
}

fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        // Latin-1 maps every byte to the code point of the same value
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}
