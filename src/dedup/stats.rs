//! Counters for one directory and for a whole run.

use serde::Serialize;

/// Counts produced by deduplicating a single directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Files visited in the directory
    pub total_files: u64,
    /// Duplicates removed (or found, in dry-run mode)
    pub deleted_files: u64,
    /// Files that could not be hashed or removed
    pub error_files: u64,
    /// Bytes freed by the removals
    pub bytes_reclaimed: u64,
}

/// Totals for one top-level run.
///
/// Counters only ever grow while the walk is in progress. The walker emits
/// the final value once, as the `Summary` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Files visited across all directories
    pub total_files: u64,
    /// Duplicates removed (or found, in dry-run mode)
    pub deleted_files: u64,
    /// Files that could not be hashed or removed
    pub error_files: u64,
    /// Bytes freed by the removals
    pub bytes_reclaimed: u64,
    /// Directories deduplicated
    pub directories_scanned: u64,
    /// Directories that could not be listed
    pub directories_skipped: u64,
    /// Whether duplicates were only reported, not removed
    pub dry_run: bool,
    /// Whether the run stopped early on a shutdown request
    pub interrupted: bool,
}

impl RunStatistics {
    /// Empty statistics for a run in the given mode.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Add one directory's counts to the totals.
    pub fn absorb(&mut self, dir: &DirectoryStats) {
        self.total_files += dir.total_files;
        self.deleted_files += dir.deleted_files;
        self.error_files += dir.error_files;
        self.bytes_reclaimed += dir.bytes_reclaimed;
        self.directories_scanned += 1;
    }

    /// Whether any file or directory failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_files > 0 || self.directories_skipped > 0
    }
}
