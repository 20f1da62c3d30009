//! Progress reporting using indicatif.
//!
//! [`Progress`] is a [`ReportSink`] that keeps a spinner on stderr while the
//! walk runs: directories visited, duplicates found and the directory in hand.
//! It is combined with the other sinks through [`Tee`](crate::report::Tee).
//!
//! # Accessible Mode
//!
//! When accessible mode is enabled, the spinner has no animation and updates
//! less often.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::report::{ReportSink, ScanEvent};

/// Spinner that follows the walk.
pub struct Progress {
    bar: ProgressBar,
    duplicates: AtomicU64,
    accessible: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirdedup::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::with_accessible(quiet, false)
    }

    /// Create a new progress reporter with accessible mode.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    /// * `accessible` - If true, uses a static, slow-updating line.
    #[must_use]
    pub fn with_accessible(quiet: bool, accessible: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        let progress = Self {
            bar,
            duplicates: AtomicU64::new(0),
            accessible,
        };
        progress.bar.set_style(progress.style());
        progress.bar.set_prefix("0");
        if !quiet {
            let tick_rate = if accessible { 500 } else { 100 };
            progress
                .bar
                .enable_steady_tick(Duration::from_millis(tick_rate));
        }
        progress
    }

    /// Check if accessible mode is enabled.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Directories entered so far.
    #[must_use]
    pub fn directories(&self) -> u64 {
        self.bar.position()
    }

    /// Duplicates found so far.
    #[must_use]
    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    fn style(&self) -> ProgressStyle {
        if self.accessible {
            ProgressStyle::with_template(
                "[{elapsed_precise}] {pos} directories, {prefix} duplicates {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
        } else {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {pos} directories, {prefix} duplicates {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        }
    }
}

impl ReportSink for Progress {
    fn on_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::DirectoryEntered { path } => {
                self.bar.inc(1);
                self.bar
                    .set_message(truncate_path(&path.to_string_lossy(), 40));
            }
            ScanEvent::DuplicateFound { .. } => {
                let found = self.duplicates.fetch_add(1, Ordering::Relaxed) + 1;
                self.bar.set_prefix(found.to_string());
            }
            ScanEvent::FileDeleted { .. } | ScanEvent::Error { .. } => {}
            ScanEvent::Summary(_) => self.bar.finish_and_clear(),
        }
    }
}

/// Truncate a path for display in the progress line.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
