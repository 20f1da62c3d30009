//! Structured error handling and exit codes.

use serde::Serialize;

use crate::dedup::RunStatistics;
use crate::scanner::ScanError;

/// Exit codes for the dirdedup binary.
///
/// - 0: Success (traversal completed, even with per-file errors)
/// - 1: General error (unexpected failure, invalid configuration)
/// - 2: Path not found (root missing or not a directory)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the whole tree was processed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Path not found: the root does not exist or is not a directory.
    PathNotFound = 2,
    /// Interrupted: the walk was stopped by Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DD000",
            Self::GeneralError => "DD001",
            Self::PathNotFound => "DD002",
            Self::Interrupted => "DD130",
        }
    }

    /// Exit code for a finished run.
    ///
    /// Per-file errors do not change the exit code.
    #[must_use]
    pub fn for_run(stats: &RunStatistics) -> Self {
        if stats.interrupted {
            Self::Interrupted
        } else {
            Self::Success
        }
    }

    /// Exit code for an error that ended the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ScanError>() {
            Some(ScanError::NotFound(_) | ScanError::NotADirectory(_)) => Self::PathNotFound,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
