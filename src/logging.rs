//! Logger setup for the binary.
//!
//! `RUST_LOG`, when set, decides the filter. Otherwise `-q` keeps errors
//! only, the default is info, `-v` is debug and `-vv` trace.
//!
//! Records go to stderr. `--log-file` appends a copy of each record to a
//! file, leaving a trail of every deletion. Debug builds prefix records with
//! a timestamp, and with the module path when verbose.
//!
//! ```rust,no_run
//! use dirdedup::logging::init_logging;
//! use std::path::Path;
//!
//! init_logging(1, false, Some(Path::new("dedup.log"))).unwrap();
//! ```

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::fmt::Formatter;
use env_logger::{Builder, Target};
use log::{LevelFilter, Record};

/// Install the global logger.
///
/// # Arguments
///
/// * `verbose` - `-v` count (1 = debug, 2+ = trace)
/// * `quiet` - Errors only; ignored when `RUST_LOG` is set
/// * `log_file` - File that receives a copy of every record, opened for
///   appending
///
/// A logger installed earlier in the process is kept as is.
///
/// # Errors
///
/// Returns an error if `log_file` cannot be opened.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> io::Result<()> {
    let from_env = env::var_os("RUST_LOG").is_some();
    let level = level_for(verbose, quiet);

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
    }
    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(StderrAndFile {
            file: open_log_file(path)?,
        })));
    }
    builder.format(move |buf, record| write_record(buf, record, verbose));

    if builder.try_init().is_err() {
        return Ok(());
    }
    if from_env {
        log::debug!("Log filter taken from RUST_LOG");
    } else {
        log::debug!("Log level {}", level);
    }
    Ok(())
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(debug_assertions)]
fn write_record(buf: &mut Formatter, record: &Record<'_>, verbose: u8) -> io::Result<()> {
    let style = buf.default_level_style(record.level());
    let timestamp = buf.timestamp_seconds();
    write!(buf, "{timestamp} {style}{:<5}{style:#} ", record.level())?;
    if verbose > 0 {
        write!(buf, "[{}] ", record.module_path().unwrap_or("?"))?;
    }
    writeln!(buf, "{}", record.args())
}

#[cfg(not(debug_assertions))]
fn write_record(buf: &mut Formatter, record: &Record<'_>, _verbose: u8) -> io::Result<()> {
    let style = buf.default_level_style(record.level());
    writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
}

/// Log target writing to stderr and a file.
struct StderrAndFile {
    file: File,
}

impl Write for StderrAndFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The file copy is the one that must not be lost
        let _ = io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}
