//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`config.toml` in the platform config directory, or `--config PATH`)
//! 3. `DIRDEDUP_*` environment variables (`DIRDEDUP_DRY_RUN=true`)
//! 4. Command-line flags ([`Config::merge_cli`])
//!
//! Unknown keys in the file do not fail the load. Each one is logged as a
//! warning, with a "did you mean" suggestion when a known key is close.
//!
//! ```toml
//! hash_algorithm = "blake3"
//! skip_hidden = true
//! copy_markers = ["Kopie", "copie"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Prefix of the environment variables read by [`Config::load_from_path`].
pub const ENV_PREFIX: &str = "DIRDEDUP_";

/// Keys accepted in the configuration file.
pub const KNOWN_KEYS: [&str; 5] = [
    "hash_algorithm",
    "follow_symlinks",
    "skip_hidden",
    "dry_run",
    "copy_markers",
];

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file named on the command line does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The file could not be read or written.
    #[error("Config I/O error for {path}: {source}")]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML.
    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        /// Path of the configuration file
        path: PathBuf,
        /// The TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// A value has the wrong type or an unknown variant.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No platform configuration directory could be determined.
    #[error("Failed to determine project directories")]
    NoConfigDir,
}

/// An unrecognized key found in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// The key as written
    pub key: String,
    /// Closest known key, if any is close enough
    pub suggestion: Option<&'static str>,
}

impl std::fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.suggestion {
            Some(known) => write!(f, "unknown key '{}' (did you mean '{}'?)", self.key, known),
            None => write!(f, "unknown key '{}'", self.key),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digest algorithm used to compare contents.
    pub hash_algorithm: HashAlgorithm,
    /// Hash symlinked files and descend into symlinked directories.
    pub follow_symlinks: bool,
    /// Ignore files and directories whose names start with `.`.
    pub skip_hidden: bool,
    /// Report duplicates without deleting them.
    pub dry_run: bool,
    /// Extra words that mark a file name as a copy.
    pub copy_markers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Md5,
            follow_symlinks: false,
            skip_hidden: false,
            dry_run: false,
            copy_markers: Vec::new(),
        }
    }
}

impl Config {
    /// Load the configuration, using `explicit` instead of the default path
    /// when given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist, and
    /// the errors of [`Config::load_from_path`] otherwise. A missing file at
    /// the default location is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load_from_path(path),
            None => match Self::config_path() {
                Ok(path) => Self::load_from_path(&path),
                Err(e) => {
                    log::debug!("{}, using defaults and environment only", e);
                    Self::figment(None).extract().map_err(|e| Box::new(e).into())
                }
            },
        }
    }

    /// Load the configuration from a specific file, then apply environment
    /// variables.
    ///
    /// A missing file yields the defaults (plus environment).
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, is not TOML, or holds a
    /// value of the wrong type.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let table: toml::Table =
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            for unknown in unknown_keys(&table) {
                log::warn!("{}: {}", path.display(), unknown);
            }
            log::debug!("Loaded config from {}", path.display());
        } else {
            log::debug!("No config file at {}", path.display());
        }

        Self::figment(Some(path))
            .extract()
            .map_err(|e| Box::new(e).into())
    }

    /// Build the defaults < file < environment figment.
    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).only(&KNOWN_KEYS))
    }

    /// Apply command-line flags on top of the loaded configuration.
    ///
    /// Boolean flags only ever switch a setting on or, with their `--no-`
    /// form, off; absent flags leave the loaded value alone. Markers given on
    /// the command line are added to the configured ones.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(algorithm) = cli.algorithm {
            self.hash_algorithm = algorithm;
        }
        if cli.dry_run {
            self.dry_run = true;
        } else if cli.no_dry_run {
            self.dry_run = false;
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        } else if cli.no_follow_symlinks {
            self.follow_symlinks = false;
        }
        if cli.skip_hidden {
            self.skip_hidden = true;
        } else if cli.no_skip_hidden {
            self.skip_hidden = false;
        }
        for marker in &cli.markers {
            if !self.copy_markers.contains(marker) {
                self.copy_markers.push(marker.clone());
            }
        }
    }

    /// Walker settings for this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_hash_algorithm(self.hash_algorithm)
            .with_follow_symlinks(self.follow_symlinks)
            .with_skip_hidden(self.skip_hidden)
            .with_dry_run(self.dry_run)
            .with_copy_markers(self.copy_markers.clone())
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when the platform has no home
    /// directory to derive it from.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let project_dirs =
            ProjectDirs::from("", "", "dirdedup").ok_or(ConfigError::NoConfigDir)?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}

/// Top-level keys of `table` that [`Config`] does not recognize.
#[must_use]
pub fn unknown_keys(table: &toml::Table) -> Vec<UnknownKey> {
    table
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|key| UnknownKey {
            key: key.clone(),
            suggestion: suggest_key(key),
        })
        .collect()
}

/// Closest known key by edit distance, if within two edits.
fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::levenshtein(key, known)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| known)
}
