//! Per-directory duplicate removal.
//!
//! # Overview
//!
//! Deduplication is scoped to one directory at a time. The walker reads a
//! directory's immediate files into a [`DirectoryBatch`] and hands it to a
//! [`DirectoryDeduplicator`], which:
//!
//! 1. **Pass 1** indexes every file whose name looks normal, so those
//!    files become the survivors. A normal name whose content is already
//!    indexed is left for pass 2.
//! 2. **Pass 2** hashes the files whose names look like generated copies
//!    (`photo (1).jpg`, `notes copy.txt`) and removes each remaining file
//!    whose content is already indexed.
//!
//! Both passes visit files in file name order. The [`DigestIndex`] and
//! [`ProcessedSet`] live only as long as one batch, so identical files in
//! different directories are never compared.
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::actions::DeleteMode;
//! use dirdedup::dedup::{DirectoryBatch, DirectoryDeduplicator};
//! use dirdedup::report::LogSink;
//! use dirdedup::scanner::{Hasher, NameClassifier, WalkerConfig};
//! use std::path::Path;
//!
//! let classifier = NameClassifier::default();
//! let dedup = DirectoryDeduplicator::new(
//!     Hasher::new(),
//!     &classifier,
//!     &DeleteMode::Permanent,
//!     &LogSink,
//! );
//!
//! let mut batch = DirectoryBatch::read(Path::new("Downloads"), &WalkerConfig::default()).unwrap();
//! let stats = dedup.process(&mut batch);
//! println!("removed {} of {} files", stats.deleted_files, stats.total_files);
//! ```

pub mod deduplicator;
pub mod stats;

use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scanner::{Digest, FileEntry, ScanError, WalkerConfig};

pub use deduplicator::DirectoryDeduplicator;
pub use stats::{DirectoryStats, RunStatistics};

/// The files physically present in one directory at scan time.
///
/// Not recursive: subdirectories are left to their own batch. Entries are
/// kept sorted by file name.
#[derive(Debug, Clone)]
pub struct DirectoryBatch {
    dir: PathBuf,
    entries: Vec<FileEntry>,
    unreadable: Vec<(PathBuf, String)>,
}

impl DirectoryBatch {
    /// Build a batch from already-collected entries.
    ///
    /// Entries are sorted by file name.
    #[must_use]
    pub fn new(dir: PathBuf, mut entries: Vec<FileEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            dir,
            entries,
            unreadable: Vec::new(),
        }
    }

    /// List the files directly inside `dir`.
    ///
    /// Directories and special files (sockets, FIFOs, devices) are left out.
    /// Symbolic links are left out unless `config.follow_symlinks` is set,
    /// in which case links to files (and dangling links) are included and
    /// links to directories are not. Hidden names are left out when
    /// `config.skip_hidden` is set.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] if the directory itself cannot be listed.
    /// Individual entries that cannot be inspected are kept aside in
    /// [`unreadable`](Self::unreadable) and reported by the deduplicator.
    pub fn read(dir: &Path, config: &WalkerConfig) -> Result<Self, ScanError> {
        let read_dir = fs::read_dir(dir).map_err(|e| ScanError::from_io(dir, e))?;
        let mut entries = Vec::new();
        let mut unreadable = Vec::new();

        for item in read_dir {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    unreadable.push((dir.to_path_buf(), format!("Unreadable entry: {e}")));
                    continue;
                }
            };

            let name = item.file_name();
            if config.skip_hidden && is_hidden(&name) {
                log::trace!("Skipping hidden file: {}", item.path().display());
                continue;
            }

            let path = item.path();
            let file_type = match item.file_type() {
                Ok(t) => t,
                Err(e) => {
                    unreadable.push((path, format!("Cannot determine file type: {e}")));
                    continue;
                }
            };

            let (size, is_symlink) = if file_type.is_symlink() {
                if !config.follow_symlinks {
                    log::trace!("Skipping symlink: {}", path.display());
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_dir() => continue,
                    Ok(meta) if !meta.is_file() => continue,
                    Ok(meta) => (Some(meta.len()), true),
                    // Dangling link; hashing will report it
                    Err(_) => (None, true),
                }
            } else if file_type.is_file() {
                (item.metadata().ok().map(|m| m.len()), false)
            } else {
                if !file_type.is_dir() {
                    log::trace!("Skipping special file: {}", path.display());
                }
                continue;
            };

            let mut entry = FileEntry::new(path, size);
            entry.is_symlink = is_symlink;
            entries.push(entry);
        }

        let mut batch = Self::new(dir.to_path_buf(), entries);
        batch.unreadable = unreadable;
        Ok(batch)
    }

    /// Entries that were listed but could not be inspected, with the reason.
    #[must_use]
    pub fn unreadable(&self) -> &[(PathBuf, String)] {
        &self.unreadable
    }

    pub(crate) fn push_unreadable(&mut self, path: PathBuf, message: String) {
        self.unreadable.push((path, message));
    }

    /// Directory this batch was read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Entries in file name order.
    #[must_use]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [FileEntry] {
        &mut self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose files were removed from disk.
    pub fn remove_all(&mut self, names: &HashSet<OsString>) {
        if !names.is_empty() {
            self.entries.retain(|e| !names.contains(&e.name));
        }
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Content digest → path of the file kept for that content.
///
/// Holds at most one path per digest.
#[derive(Debug, Default)]
pub struct DigestIndex {
    survivors: HashMap<Digest, PathBuf>,
}

impl DigestIndex {
    /// Record `path` as the survivor for `digest`.
    ///
    /// Returns the previously indexed path, if any, which is no longer
    /// referenced by the index.
    pub fn insert(&mut self, digest: Digest, path: PathBuf) -> Option<PathBuf> {
        self.survivors.insert(digest, path)
    }

    /// Survivor for `digest`, if one is indexed.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&Path> {
        self.survivors.get(digest).map(PathBuf::as_path)
    }

    /// Number of distinct digests indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    /// Whether nothing has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }
}

/// File names already handled (kept, removed or failed) in one batch.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    names: HashSet<OsString>,
}

impl ProcessedSet {
    /// Mark a name as handled.
    ///
    /// A name is marked exactly once per batch.
    pub fn mark(&mut self, name: &OsStr) {
        let inserted = self.names.insert(name.to_owned());
        debug_assert!(inserted, "{name:?} processed twice");
    }

    /// Whether a name has been handled.
    #[must_use]
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// Number of names handled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no name has been handled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
