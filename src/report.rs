//! Status events and the sinks that receive them.
//!
//! The walk never prints or formats anything itself. Everything a front end
//! needs (progress, deletions, errors, the final summary) arrives as a
//! [`ScanEvent`] passed to a [`ReportSink`].
//!
//! Provided sinks:
//! - [`LogSink`]: forwards events to the `log` facade
//! - [`EventLog`]: records events in memory
//! - `std::sync::mpsc::Sender<ScanEvent>`: forwards events to another thread
//! - [`Tee`]: fans one event out to several sinks
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::report::ScanEvent;
//! use dirdedup::scanner::{TreeWalker, WalkerConfig};
//! use std::path::PathBuf;
//! use std::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel::<ScanEvent>();
//! let worker = std::thread::spawn(move || {
//!     TreeWalker::new(&PathBuf::from("."), WalkerConfig::default()).run(&tx)
//! });
//! for event in rx {
//!     println!("{event:?}");
//! }
//! let _ = worker.join();
//! ```

use std::path::PathBuf;
use std::sync::{mpsc, Mutex, PoisonError};

use serde::Serialize;

use crate::dedup::RunStatistics;

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    /// A directory is about to be deduplicated.
    DirectoryEntered {
        /// Directory path
        path: PathBuf,
    },
    /// A file has the same content as a file kept earlier in its directory.
    DuplicateFound {
        /// The file that is kept
        original: PathBuf,
        /// The file that is removed (or would be, in dry-run mode)
        duplicate: PathBuf,
    },
    /// A duplicate was removed from disk.
    FileDeleted {
        /// Removed file
        path: PathBuf,
        /// Size of the removed file in bytes
        size: u64,
    },
    /// A file or directory could not be processed.
    Error {
        /// Path the error relates to
        path: PathBuf,
        /// Human-readable cause
        message: String,
    },
    /// Final statistics. Always the last event of a run.
    Summary(RunStatistics),
}

/// Receiver for [`ScanEvent`]s.
///
/// Implementations must not panic; a sink that fails to deliver an event
/// should drop it.
pub trait ReportSink: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &ScanEvent);
}

impl<S: ReportSink + ?Sized> ReportSink for &S {
    fn on_event(&self, event: &ScanEvent) {
        (**self).on_event(event);
    }
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn on_event(&self, event: &ScanEvent) {
        (**self).on_event(event);
    }
}

impl ReportSink for mpsc::Sender<ScanEvent> {
    fn on_event(&self, event: &ScanEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.send(event.clone());
    }
}

/// Sink that writes events as log records.
///
/// Per-file events (directories, duplicates, deletions) are logged at debug
/// so they stay off the progress line at the default level; `-v` brings
/// them back, also into `--log-file`. Errors are logged at warn, the
/// summary at info.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LogSink {
    /// Level an event is logged at.
    #[must_use]
    pub fn level_of(event: &ScanEvent) -> log::Level {
        match event {
            ScanEvent::DirectoryEntered { .. }
            | ScanEvent::DuplicateFound { .. }
            | ScanEvent::FileDeleted { .. } => log::Level::Debug,
            ScanEvent::Error { .. } => log::Level::Warn,
            ScanEvent::Summary(_) => log::Level::Info,
        }
    }
}

impl ReportSink for LogSink {
    fn on_event(&self, event: &ScanEvent) {
        let level = Self::level_of(event);
        match event {
            ScanEvent::DirectoryEntered { path } => {
                log::log!(level, "Processing directory: {}", path.display());
            }
            ScanEvent::DuplicateFound {
                original,
                duplicate,
            } => {
                log::log!(
                    level,
                    "Duplicate found: {} (original: {})",
                    duplicate.display(),
                    original.display()
                );
            }
            ScanEvent::FileDeleted { path, size } => {
                log::log!(level, "Deleted duplicate: {} ({} bytes)", path.display(), size);
            }
            ScanEvent::Error { path, message } => {
                log::log!(level, "{}: {}", path.display(), message);
            }
            ScanEvent::Summary(stats) => {
                log::log!(
                    level,
                    "Finished: {} files, {} {}, {} errors",
                    stats.total_files,
                    stats.deleted_files,
                    if stats.dry_run {
                        "duplicates found"
                    } else {
                        "duplicates deleted"
                    },
                    stats.error_files
                );
            }
        }
    }
}

/// Sink that records every event in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ScanEvent>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events received so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Paths of every `FileDeleted` event.
    #[must_use]
    pub fn deleted_paths(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::FileDeleted { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Paths of every `Error` event.
    #[must_use]
    pub fn error_paths(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::Error { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// The `Summary` event's statistics, if the run finished.
    #[must_use]
    pub fn summary(&self) -> Option<RunStatistics> {
        self.events().into_iter().rev().find_map(|e| match e {
            ScanEvent::Summary(stats) => Some(stats),
            _ => None,
        })
    }
}

impl ReportSink for EventLog {
    fn on_event(&self, event: &ScanEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Sink that forwards each event to several sinks, in order.
pub struct Tee<'a> {
    sinks: Vec<&'a dyn ReportSink>,
}

impl<'a> Tee<'a> {
    /// Create a tee over the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<&'a dyn ReportSink>) -> Self {
        Self { sinks }
    }
}

impl ReportSink for Tee<'_> {
    fn on_event(&self, event: &ScanEvent) {
        for sink in &self.sinks {
            sink.on_event(event);
        }
    }
}
