//! Directory tree walker.
//!
//! # Overview
//!
//! [`TreeWalker`] visits every directory under a root exactly once, in
//! pre-order with siblings sorted by name, and runs a
//! [`DirectoryDeduplicator`] over each directory's immediate files. Counts
//! are accumulated into [`RunStatistics`] and emitted as a single
//! `Summary` event at the end.
//!
//! The walk is sequential. Cancellation is cooperative and only observed
//! between directories, so a directory is always processed completely or
//! not at all.
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::report::LogSink;
//! use dirdedup::scanner::{TreeWalker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_dry_run(true);
//! let stats = TreeWalker::new(Path::new("/home/user/Downloads"), config)
//!     .run(&LogSink)
//!     .unwrap();
//! println!("{} duplicates found", stats.deleted_files);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{Hasher, NameClassifier, ScanError, WalkerConfig};
use crate::actions::DeleteMode;
use crate::dedup::{DirectoryBatch, DirectoryDeduplicator, RunStatistics};
use crate::report::{ReportSink, ScanEvent};

/// Walks a directory tree and deduplicates each directory in turn.
#[derive(Debug)]
pub struct TreeWalker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl TreeWalker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to deduplicate
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// The flag is checked before each directory. Once it is set the walk
    /// stops, the statistics are marked interrupted and the summary is still
    /// emitted.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root path of the walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Make sure the root exists and is a directory.
    fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| ScanError::from_io(&self.root, e))?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ScanError::NotADirectory(self.root.clone()))
        }
    }

    /// Whether walkdir should yield (and descend into) this entry.
    fn keep_directory(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        if self.config.skip_hidden
            && entry.depth() > 0
            && entry.file_name().to_string_lossy().starts_with('.')
        {
            log::trace!("Skipping hidden directory: {}", entry.path().display());
            return false;
        }
        true
    }

    /// Deduplicate every directory under the root.
    ///
    /// Per-file and per-directory failures are reported to `sink` and
    /// counted; they never stop the walk.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] if the root does not exist
    /// - [`ScanError::NotADirectory`] if the root is not a directory
    /// - [`ScanError::PermissionDenied`] or [`ScanError::Io`] if the root
    ///   cannot be inspected
    ///
    /// Nothing is read or removed when an error is returned.
    pub fn run(&self, sink: &dyn ReportSink) -> Result<RunStatistics, ScanError> {
        self.validate_root()?;

        let hasher = Hasher::with_algorithm(self.config.hash_algorithm);
        let classifier = NameClassifier::with_markers(&self.config.copy_markers);
        let remover = DeleteMode::for_run(self.config.dry_run);
        let dedup = DirectoryDeduplicator::new(hasher, &classifier, &remover, sink);

        let mut stats = RunStatistics::new(self.config.dry_run);
        // walkdir reports an unreadable directory again after yielding it
        let mut last_skipped: Option<PathBuf> = None;

        log::info!(
            "Scanning {} ({}{})",
            self.root.display(),
            self.config.hash_algorithm,
            if self.config.dry_run { ", dry run" } else { "" }
        );

        let walk = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.keep_directory(e));

        for item in walk {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping before next directory");
                stats.interrupted = true;
                break;
            }

            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    if e.loop_ancestor().is_some() {
                        log::warn!("Symlink loop, not descending: {}", path.display());
                    } else if last_skipped.as_deref() == Some(path.as_path()) {
                        log::trace!("Already reported: {}", path.display());
                    } else {
                        self.skip_directory(&path, &e.to_string(), &mut stats, sink);
                    }
                    continue;
                }
            };

            let dir = entry.path();
            sink.on_event(&ScanEvent::DirectoryEntered {
                path: dir.to_path_buf(),
            });

            match DirectoryBatch::read(dir, &self.config) {
                Ok(mut batch) => {
                    let dir_stats = dedup.process(&mut batch);
                    stats.absorb(&dir_stats);
                }
                Err(e) => {
                    self.skip_directory(dir, &e.to_string(), &mut stats, sink);
                    last_skipped = Some(dir.to_path_buf());
                }
            }
        }

        log::debug!(
            "Walk finished: {} directories scanned, {} skipped",
            stats.directories_scanned,
            stats.directories_skipped
        );
        sink.on_event(&ScanEvent::Summary(stats.clone()));
        Ok(stats)
    }

    fn skip_directory(
        &self,
        path: &Path,
        message: &str,
        stats: &mut RunStatistics,
        sink: &dyn ReportSink,
    ) {
        log::warn!("Skipping directory {}: {}", path.display(), message);
        stats.directories_skipped += 1;
        sink.on_event(&ScanEvent::Error {
            path: path.to_path_buf(),
            message: message.to_string(),
        });
    }
}
