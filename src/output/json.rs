//! JSON lines output for scan events.
//!
//! Provides machine-readable output for scripting and automation: one JSON
//! object per event, written as the event happens.
//!
//! # Output Schema
//!
//! ```json
//! {"event":"directory_entered","path":"/data/photos"}
//! {"event":"duplicate_found","original":"/data/photos/a.jpg","duplicate":"/data/photos/a (1).jpg"}
//! {"event":"file_deleted","path":"/data/photos/a (1).jpg","size":1024}
//! {"event":"error","path":"/data/photos/locked.jpg","message":"Cannot hash /data/photos/locked.jpg: permission denied"}
//! {"event":"summary","total_files":3,"deleted_files":1,"error_files":1,"bytes_reclaimed":1024,
//!  "directories_scanned":1,"directories_skipped":0,"dry_run":false,"interrupted":false}
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::output::JsonLinesSink;
//! use dirdedup::scanner::{TreeWalker, WalkerConfig};
//! use std::path::Path;
//!
//! let sink = JsonLinesSink::new(std::io::stdout());
//! TreeWalker::new(Path::new("."), WalkerConfig::default())
//!     .run(&sink)
//!     .unwrap();
//! ```

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::report::{ReportSink, ScanEvent};

/// Writes each event as one line of JSON.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
    failed: AtomicBool,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Create a sink writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            failed: AtomicBool::new(false),
        }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_event(&self, event: &ScanEvent) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, event)?;
        writer.write_all(b"\n")?;
        if matches!(event, ScanEvent::Summary(_)) {
            writer.flush()?;
        }
        Ok(())
    }
}

impl<W: Write + Send> ReportSink for JsonLinesSink<W> {
    fn on_event(&self, event: &ScanEvent) {
        if let Err(e) = self.write_event(event) {
            // Warn once; a closed stdout would otherwise repeat for every event
            if !self.failed.swap(true, Ordering::Relaxed) {
                log::warn!("Failed to write JSON output: {}", e);
            }
        }
    }
}
