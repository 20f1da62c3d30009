//! dirdedup - Per-directory duplicate file remover
//!
//! Walks a directory tree and, inside each directory, deletes files whose
//! content is identical to another file in that same directory. When one of
//! two identical files has a name that looks like a generated copy
//! (`photo (1).jpg`, `notes copy.txt`, `报告 副本.doc`), that is the one
//! removed.
//!
//! The library is organized bottom-up:
//! - [`scanner`]: content hashing, copy-name classification and the tree walker
//! - [`dedup`]: the two-pass per-directory algorithm and its statistics
//! - [`actions`]: file removal (permanent or dry run)
//! - [`report`]: events emitted during a run and the sinks that consume them
//!
//! The binary front end lives in [`cli`], [`config`], [`logging`],
//! [`progress`], [`output`] and [`signal`], tied together by [`run_app`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{render_summary, JsonLinesSink};
use crate::progress::Progress;
use crate::report::{LogSink, ReportSink, Tee};
use crate::scanner::TreeWalker;

/// Run the application for parsed command-line arguments.
///
/// Per-file errors are reported and counted but still yield
/// [`ExitCode::Success`]; only an interrupted walk changes the exit code of
/// a completed run.
///
/// # Errors
///
/// Returns an error if the log file or configuration cannot be loaded, or
/// if the root path is missing or not a directory (a [`scanner::ScanError`]
/// that [`ExitCode::for_error`] maps to exit code 2).
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .context("Failed to open log file")?;

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler();
    let walker =
        TreeWalker::new(&cli.path, config.walker_config()).with_shutdown_flag(handler.get_flag());

    let stats = match cli.output {
        OutputFormat::Text => {
            let progress = Progress::with_accessible(cli.quiet, cli.accessible);
            let sink = Tee::new(vec![&LogSink as &dyn ReportSink, &progress]);
            let stats = walker.run(&sink)?;

            if !cli.quiet {
                let color = !cli.no_color && io::stdout().is_terminal();
                print!("{}", render_summary(&stats, color));
            }
            stats
        }
        OutputFormat::Json => {
            let json = JsonLinesSink::new(io::stdout());
            let sink = Tee::new(vec![&LogSink as &dyn ReportSink, &json]);
            walker.run(&sink)?
        }
    };

    Ok(ExitCode::for_run(&stats))
}
