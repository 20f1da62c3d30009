//! Human-readable run summary.
//!
//! ```text
//! Scanned 12 directories, 340 files
//! Deleted 5 duplicates, 1.2 MiB reclaimed
//! 1 error, 0 directories skipped
//! ```

use std::fmt::Write as _;

use bytesize::ByteSize;
use yansi::{Condition, Paint};

use crate::dedup::RunStatistics;

/// Render the final statistics as a few lines of text.
///
/// # Arguments
///
/// * `stats` - Final statistics of the run
/// * `color` - Whether to emit ANSI colors
#[must_use]
pub fn render_summary(stats: &RunStatistics, color: bool) -> String {
    let when = if color {
        Condition::ALWAYS
    } else {
        Condition::NEVER
    };
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Scanned {} {}, {} {}",
        stats.directories_scanned,
        plural(stats.directories_scanned, "directory", "directories"),
        stats.total_files,
        plural(stats.total_files, "file", "files"),
    );

    let size = ByteSize::b(stats.bytes_reclaimed).to_string();
    let removal = if stats.dry_run {
        format!(
            "Found {} {}, {} reclaimable (dry run, nothing deleted)",
            stats.deleted_files,
            plural(stats.deleted_files, "duplicate", "duplicates"),
            size
        )
    } else {
        format!(
            "Deleted {} {}, {} reclaimed",
            stats.deleted_files,
            plural(stats.deleted_files, "duplicate", "duplicates"),
            size
        )
    };
    let _ = writeln!(out, "{}", removal.green().bold().whenever(when));

    if stats.has_errors() {
        let errors = format!(
            "{} {}, {} {} skipped",
            stats.error_files,
            plural(stats.error_files, "error", "errors"),
            stats.directories_skipped,
            plural(stats.directories_skipped, "directory", "directories"),
        );
        let _ = writeln!(out, "{}", errors.yellow().whenever(when));
    }

    if stats.interrupted {
        let _ = writeln!(
            out,
            "{}",
            "Interrupted before the walk finished".red().whenever(when)
        );
    }

    out
}

fn plural(count: u64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
