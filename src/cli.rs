//! Command-line interface definitions for dirdedup.
//!
//! This module defines all CLI arguments using the clap derive API. Flags
//! that also exist in the configuration file override it when given.
//!
//! # Example
//!
//! ```bash
//! # Remove copies such as "photo (1).jpg" when they match "photo.jpg"
//! dirdedup ~/Downloads
//!
//! # Only report what would be removed, as JSON lines
//! dirdedup ~/Downloads --dry-run --output json
//!
//! # Treat "Kopie" as a copy marker too, and keep a log
//! dirdedup ~/Downloads --marker Kopie --log-file dedup.log
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Remove duplicate files within each directory of a tree.
///
/// Inside every directory, files whose content matches another file are
/// deleted. Names that look like generated copies ("report (1).txt",
/// "notes copy.txt", "照片 副本.jpg") are the ones removed; the file with the
/// normal-looking name is kept. Files are never compared across directories.
#[derive(Debug, Parser)]
#[command(name = "dirdedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to deduplicate
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Output errors in JSON format
    #[arg(long)]
    pub json_errors: bool,

    /// Also append log records to this file (add -v to record each deletion)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (text for humans, json for one event per line)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Report duplicates without deleting anything
    #[arg(short = 'n', long, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// Delete duplicates, even if the config file asks for a dry run
    #[arg(long, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// Hash algorithm used to compare file contents
    #[arg(short, long, value_enum, value_name = "ALGORITHM")]
    pub algorithm: Option<HashAlgorithm>,

    /// Follow symbolic links to files and directories
    ///
    /// A link that points nowhere is reported as an error file.
    #[arg(long, overrides_with = "no_follow_symlinks")]
    pub follow_symlinks: bool,

    /// Do not follow symbolic links, even if the config file says so
    #[arg(long, overrides_with = "follow_symlinks")]
    pub no_follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long, overrides_with = "no_skip_hidden")]
    pub skip_hidden: bool,

    /// Include hidden files and directories, even if the config file skips them
    #[arg(long, overrides_with = "skip_hidden")]
    pub no_skip_hidden: bool,

    /// Extra word marking a file name as a copy (can be specified multiple times)
    ///
    /// Matches "<name> MARKER" and "<name> MARKER (N)" before the extension.
    #[arg(short, long = "marker", value_name = "WORD")]
    pub markers: Vec<String>,

    /// Use a screen-reader friendly progress line
    #[arg(long)]
    pub accessible: bool,
}

/// Output format for run results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Progress spinner and a colored summary
    #[default]
    Text,
    /// One JSON object per event on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
