//! Duplicate removal.
//!
//! # Overview
//!
//! Removal is permanent: there is no trash or undo. [`DeleteMode::DryRun`]
//! measures what a removal would free without touching the file, which is
//! how the dry-run mode reports duplicates.
//!
//! The deduplicator only talks to the [`FileRemover`] trait, so other
//! removal policies can be plugged in.
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate (1).txt");
//! if let Err(e) = permanent_delete(&path) {
//!     eprintln!("{e}");
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a duplicate could not be removed. The file stays on disk.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Removed by someone else between hashing and removal.
    #[error("Cannot remove {0}: not found")]
    NotFound(PathBuf),

    /// Read-only file, directory or mount.
    #[error("Cannot remove {0}: permission denied")]
    PermissionDenied(PathBuf),

    #[error("Cannot remove {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Map an I/O failure on `path` to the matching variant.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }

    /// The file that could not be removed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful (or simulated) removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was removed.
    pub path: PathBuf,
    /// Size of the removed file in bytes.
    pub size: u64,
    /// Whether the file was left on disk.
    pub dry_run: bool,
}

/// Something that can remove a confirmed duplicate.
pub trait FileRemover: Send + Sync {
    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeleteError`] if the file cannot be removed. The caller
    /// counts the failure and moves on.
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError>;
}

/// Built-in removal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Unlink the file.
    #[default]
    Permanent,
    /// Leave the file in place and report its size.
    DryRun,
}

impl DeleteMode {
    /// Pick the mode for a run.
    #[must_use]
    pub fn for_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::Permanent
        }
    }
}

impl FileRemover for DeleteMode {
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError> {
        match self {
            Self::Permanent => permanent_delete(path),
            Self::DryRun => {
                let size = file_size(path)?;
                log::debug!("Dry run, keeping: {}", path.display());
                Ok(DeleteResult {
                    path: path.to_path_buf(),
                    size,
                    dry_run: true,
                })
            }
        }
    }
}

/// Size of the file (or link) itself, without following symlinks.
fn file_size(path: &Path) -> Result<u64, DeleteError> {
    fs::symlink_metadata(path)
        .map(|m| m.len())
        .map_err(|e| DeleteError::from_io(path, e))
}

/// Unlink `path` and report how many bytes it held. There is no undo.
///
/// A symbolic link is removed itself; its target is left alone.
///
/// # Errors
///
/// Returns a [`DeleteError`] if the file is gone or cannot be unlinked.
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;

    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::trace!("Removed {} ({} bytes)", path.display(), size);

    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        dry_run: false,
    })
}
