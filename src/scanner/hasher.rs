//! Streaming content hasher.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing a content digest
//! of a file by reading it in fixed-size [`CHUNK_SIZE`] blocks, so memory use
//! stays constant regardless of file size.
//!
//! MD5 is the default algorithm. Digests are only used as an equality proxy
//! between files of one directory, so collision resistance beyond that is not
//! required. BLAKE3 and SHA-256 can be selected instead.
//!
//! # Example
//!
//! ```no_run
//! use dirdedup::scanner::{HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::with_algorithm(HashAlgorithm::Md5);
//! let digest = hasher.hash_file(Path::new("photo.jpg")).unwrap();
//! println!("{digest}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::HashError;

/// Size of each read while hashing (4 KiB).
pub const CHUNK_SIZE: usize = 4096;

/// Digest algorithm used to fingerprint file contents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 128-bit MD5 (default)
    #[default]
    Md5,
    /// 256-bit BLAKE3
    Blake3,
    /// 256-bit SHA-256
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Blake3 | Self::Sha256 => 32,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Fixed-size content fingerprint.
///
/// Displays as lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Box<[u8]>);

impl Digest {
    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding of the digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

/// In-progress hash state for one file.
enum State {
    Md5(md5::Context),
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
}

impl State {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(md5::Context::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Md5(ctx) => ctx.consume(chunk),
            Self::Blake3(hasher) => {
                hasher.update(chunk);
            }
            Self::Sha256(hasher) => hasher.update(chunk),
        }
    }

    fn finish(self) -> Digest {
        let bytes: Box<[u8]> = match self {
            Self::Md5(ctx) => Box::new(ctx.compute().0),
            Self::Blake3(hasher) => Box::new(*hasher.finalize().as_bytes()),
            Self::Sha256(hasher) => hasher.finalize().to_vec().into_boxed_slice(),
        };
        Digest(bytes)
    }
}

/// Streaming file hasher.
///
/// Stateless apart from the selected algorithm, so one instance can be
/// shared by the whole run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    /// Create a hasher using the default algorithm (MD5).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher for a specific algorithm.
    #[must_use]
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm this hasher uses.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash the full contents of a file.
    ///
    /// The file is read in [`CHUNK_SIZE`] blocks until end-of-stream.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file vanished before or while it was opened
    /// - `PermissionDenied` if the file cannot be read
    /// - `Io` for any other read failure
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self
            .hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;
        log::trace!("{} {} {}", self.algorithm, digest, path.display());
        Ok(digest)
    }

    /// Hash everything a reader yields.
    ///
    /// # Errors
    ///
    /// Returns the first non-`Interrupted` I/O error from the reader.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut state = State::new(self.algorithm);
        let mut buf = [0u8; CHUNK_SIZE];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buf[..n]);
        }

        Ok(state.finish())
    }
}
