//! Two-pass duplicate removal for one directory.
//!
//! Pass 1 hashes and indexes every file whose name looks normal; the first
//! such file for a given content becomes its survivor. Pass 2 handles what
//! is left (names that look like generated copies, and later normal names
//! whose content was already indexed) and removes each file whose digest is
//! indexed. Running the normal names first is what makes `photo.jpg` survive
//! over `photo (1).jpg`, whichever sorts first. The name is never proof of
//! duplication: a copy-looking file with unique content is indexed and kept.
//! Nothing is removed during pass 1.
//!
//! Symbolic links (only present when links are followed) never take part in
//! pass 1, and pass 2 visits them after every real file. A link can then only
//! survive for content no real file in the directory holds, so removing a
//! real file never leaves a link to it as the survivor.
//!
//! Failures are local. A file that cannot be hashed is counted, reported and
//! left in place; a file that cannot be removed is counted and reported, and
//! processing moves on to the next file.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;

use super::{DigestIndex, DirectoryBatch, DirectoryStats, ProcessedSet};
use crate::actions::FileRemover;
use crate::report::{ReportSink, ScanEvent};
use crate::scanner::{Digest, FileEntry, HashError, Hasher, NameClassifier};

/// Removes content duplicates within a single directory.
///
/// Holds no per-directory state; one instance serves a whole run.
pub struct DirectoryDeduplicator<'a> {
    hasher: Hasher,
    classifier: &'a NameClassifier,
    remover: &'a dyn FileRemover,
    sink: &'a dyn ReportSink,
}

impl<'a> DirectoryDeduplicator<'a> {
    /// Create a deduplicator.
    ///
    /// # Arguments
    ///
    /// * `hasher` - Content hasher used to compare files
    /// * `classifier` - Decides which names are processed in pass 2
    /// * `remover` - Performs (or simulates) the removal of duplicates
    /// * `sink` - Receives duplicate, deletion and error events
    #[must_use]
    pub fn new(
        hasher: Hasher,
        classifier: &'a NameClassifier,
        remover: &'a dyn FileRemover,
        sink: &'a dyn ReportSink,
    ) -> Self {
        Self {
            hasher,
            classifier,
            remover,
            sink,
        }
    }

    /// Deduplicate one directory's files.
    ///
    /// Entries whose files were removed are dropped from `batch`. Every
    /// entry is counted in `total_files` exactly once and hashed at most
    /// once.
    pub fn process(&self, batch: &mut DirectoryBatch) -> DirectoryStats {
        let mut stats = DirectoryStats::default();
        let mut index = DigestIndex::default();
        let mut processed = ProcessedSet::default();
        let mut removed: HashSet<OsString> = HashSet::new();

        for (path, message) in batch.unreadable() {
            stats.total_files += 1;
            stats.error_files += 1;
            self.sink.on_event(&ScanEvent::Error {
                path: path.clone(),
                message: message.clone(),
            });
        }

        // Pass 1: normal-looking names become candidate originals
        for entry in batch.entries_mut() {
            stats.total_files += 1;

            if entry.is_symlink {
                log::trace!("Deferring {} (symlink)", entry.path.display());
                continue;
            }
            let name = entry.display_name();
            if let Some(pattern) = self.classifier.classify(&name) {
                log::trace!("Deferring {} ({})", entry.path.display(), pattern.label());
                continue;
            }

            match self.digest_of(entry) {
                Ok(digest) => {
                    if let Some(original) = index.get(&digest) {
                        // Same content as an earlier normal name; removed in pass 2
                        log::debug!(
                            "Deferring {} (same content as {})",
                            entry.path.display(),
                            original.display()
                        );
                        continue;
                    }
                    index.insert(digest, entry.path.clone());
                }
                Err(e) => self.record_error(&entry.path, &e, &mut stats),
            }
            processed.mark(&entry.name);
        }

        // Pass 2: real files first, then symlinks, so a link never survives
        // in place of a real file holding the same bytes
        for links in [false, true] {
            for entry in batch.entries_mut() {
                if entry.is_symlink != links || processed.contains(&entry.name) {
                    continue;
                }

                match self.digest_of(entry) {
                    Ok(digest) => match index.get(&digest) {
                        Some(original) => {
                            if self.remove_duplicate(original, entry, &mut stats) {
                                removed.insert(entry.name.clone());
                            }
                        }
                        None => {
                            log::debug!("Keeping {} (unique content)", entry.path.display());
                            index.insert(digest, entry.path.clone());
                        }
                    },
                    Err(e) => self.record_error(&entry.path, &e, &mut stats),
                }
                processed.mark(&entry.name);
            }
        }

        debug_assert_eq!(processed.len(), batch.len());
        batch.remove_all(&removed);

        log::debug!(
            "{}: {} files, {} duplicates, {} errors",
            batch.dir().display(),
            stats.total_files,
            stats.deleted_files,
            stats.error_files
        );
        stats
    }

    /// Digest of an entry, hashing it on first use.
    fn digest_of(&self, entry: &mut FileEntry) -> Result<Digest, HashError> {
        if let Some(digest) = &entry.digest {
            return Ok(digest.clone());
        }
        let digest = self.hasher.hash_file(&entry.path)?;
        entry.digest = Some(digest.clone());
        Ok(digest)
    }

    /// Remove a confirmed duplicate. Returns whether the file left the disk.
    fn remove_duplicate(
        &self,
        original: &Path,
        entry: &FileEntry,
        stats: &mut DirectoryStats,
    ) -> bool {
        self.sink.on_event(&ScanEvent::DuplicateFound {
            original: original.to_path_buf(),
            duplicate: entry.path.clone(),
        });

        match self.remover.remove(&entry.path) {
            Ok(result) => {
                stats.deleted_files += 1;
                stats.bytes_reclaimed += result.size;
                if result.dry_run {
                    false
                } else {
                    self.sink.on_event(&ScanEvent::FileDeleted {
                        path: result.path,
                        size: result.size,
                    });
                    true
                }
            }
            Err(e) => {
                self.record_error(&entry.path, &e, stats);
                false
            }
        }
    }

    fn record_error(&self, path: &Path, error: &dyn std::error::Error, stats: &mut DirectoryStats) {
        stats.error_files += 1;
        self.sink.on_event(&ScanEvent::Error {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }
}
