//! Scanner module for directory traversal, file hashing and name heuristics.
//!
//! Covers:
//! - Sequential, sorted directory walking using walkdir
//! - Streaming content hashing (MD5 by default)
//! - Recognizing file names that look like generated copies
//!
//! # Architecture
//!
//! Submodules:
//! - [`walker`]: Tree traversal, one deduplication pass per directory
//! - [`hasher`]: Streaming file hashing
//! - [`naming`]: Duplicate-looking file name classification
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::report::LogSink;
//! use dirdedup::scanner::{TreeWalker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = TreeWalker::new(Path::new("."), WalkerConfig::default());
//! let stats = walker.run(&LogSink).unwrap();
//! println!("{} duplicates removed", stats.deleted_files);
//! ```

pub mod hasher;
pub mod naming;
pub mod walker;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Digest, HashAlgorithm, Hasher, CHUNK_SIZE};
pub use naming::{is_duplicate_name, DuplicatePattern, NameClassifier};
pub use walker::TreeWalker;

/// A file discovered in one directory.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Full path to the file
    pub path: PathBuf,
    /// File name within its directory
    pub name: OsString,
    /// File size in bytes, when metadata was readable
    pub size: Option<u64>,
    /// Whether this entry is a symbolic link
    pub is_symlink: bool,
    /// Content digest, filled in the first time the file is hashed
    pub digest: Option<Digest>,
}

impl FileEntry {
    /// Create a new FileEntry for `path`.
    ///
    /// The name is taken from the last path component.
    #[must_use]
    pub fn new(path: PathBuf, size: Option<u64>) -> Self {
        let name = path
            .file_name()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| path.as_os_str().to_owned());
        Self {
            path,
            name,
            size,
            is_symlink: false,
            digest: None,
        }
    }

    /// File name as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

/// Configuration for tree walking.
///
/// Controls traversal, hashing and deletion behavior for one run.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links: hash symlinked files and descend into
    /// symlinked directories. Symlinks are skipped otherwise.
    pub follow_symlinks: bool,

    /// Ignore dot-files and dot-directories.
    pub skip_hidden: bool,

    /// Report duplicates without deleting them.
    pub dry_run: bool,

    /// Digest algorithm used to compare contents.
    pub hash_algorithm: HashAlgorithm,

    /// Extra copy markers recognized in addition to the built-in ones.
    pub copy_markers: Vec<String>,
}

impl WalkerConfig {
    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Enable or disable hidden file skipping.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Set extra copy markers.
    #[must_use]
    pub fn with_copy_markers(mut self, markers: Vec<String>) -> Self {
        self.copy_markers = markers;
        self
    }
}

/// Why a directory could not be walked or listed.
///
/// Fatal for the root, local (the directory is skipped) anywhere below it.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("No permission to list {0}")]
    PermissionDenied(PathBuf),

    #[error("No such directory: {0}")]
    NotFound(PathBuf),

    /// The path exists but names a file.
    #[error("Expected a directory, found a file: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Map an I/O failure on `path` to the matching variant.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

/// Why a file's content could not be hashed. The file is left in place.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// Gone since the directory was listed, or a dangling symlink.
    #[error("Cannot hash {0}: not found")]
    NotFound(PathBuf),

    #[error("Cannot hash {0}: permission denied")]
    PermissionDenied(PathBuf),

    #[error("Cannot hash {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Map an I/O failure on `path` to the matching variant.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}
