//! JSON settings persistence with a single-generation backup.
//!
//! Two files live side by side, by default in the working directory:
//!
//! - `eyetrack_settings.json`   – the primary settings document.
//! - `eyetrack_settings.backup` – a copy of the primary file as it was before
//!   the most recent save, kept only if that copy was well-formed.
//!
//! # Load fallback chain
//!
//! ```text
//! primary missing    ──► defaults            ("no settings file")
//! primary valid      ──► primary
//! primary malformed  ──► backup valid        ("using backup settings")
//!                    └─► backup missing or malformed ──► defaults ("using base settings")
//! ```
//!
//! Only malformed JSON triggers the fallback.  A file that parses as JSON
//! but fails schema validation is reported as [`ConfigError::Invalid`] so the
//! caller can decide what to do with it.
//!
//! # Save sequence
//!
//! 0. Check the in-memory config ([`RootConfig::validate`]); if it cannot be
//!    stored faithfully, stop without touching either file.
//! 1. If the primary file exists and is well-formed, copy it over the backup.
//!    A malformed primary is never copied.
//! 2. Overwrite the primary with the serialized in-memory config.
//!
//! The write is not atomic.  A crash mid-write leaves a truncated primary,
//! which the next load detects as malformed and recovers from the backup.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::root::{DocumentError, RootConfig};
use crate::domain::ValidationError;

/// File name of the primary settings document.
pub const CONFIG_FILE_NAME: &str = "eyetrack_settings.json";
/// File name of the single-generation backup.
pub const BACKUP_CONFIG_FILE_NAME: &str = "eyetrack_settings.backup";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file holds well-formed JSON that does not match the schema.
    #[error("settings file {path} failed validation: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    /// The in-memory config holds a value the settings file cannot store.
    /// Nothing was written.
    #[error("refusing to save settings: {0}")]
    Unsavable(#[source] ValidationError),

    /// The in-memory config could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Locations of the primary settings file and its backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub primary: PathBuf,
    pub backup: PathBuf,
}

impl Default for ConfigPaths {
    /// The conventional file names, relative to the working directory.
    fn default() -> Self {
        Self {
            primary: PathBuf::from(CONFIG_FILE_NAME),
            backup: PathBuf::from(BACKUP_CONFIG_FILE_NAME),
        }
    }
}

impl ConfigPaths {
    /// The conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            primary: dir.join(CONFIG_FILE_NAME),
            backup: dir.join(BACKUP_CONFIG_FILE_NAME),
        }
    }
}

/// Which file (if any) a loaded config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No primary file existed; defaults were used.
    NotFound,
    /// The primary file was read successfully.
    Primary,
    /// The primary file was malformed; the backup was used.
    Backup,
    /// Both the primary and the backup were unusable; defaults were used.
    Defaults,
}

impl ConfigSource {
    /// `true` when the primary file existed but could not be used.
    pub fn is_fallback(self) -> bool {
        matches!(self, ConfigSource::Backup | ConfigSource::Defaults)
    }
}

/// A loaded config together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub config: RootConfig,
    pub source: ConfigSource,
}

/// State of a single settings file on disk.
#[derive(Debug)]
pub enum FileStatus {
    Missing,
    Valid(Box<RootConfig>),
    /// Not valid JSON.
    Malformed(serde_json::Error),
    /// Valid JSON that fails schema validation.
    Invalid(ValidationError),
}

/// Reads and classifies the settings file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file system errors other than "not found".
/// Parse and validation failures are reported through [`FileStatus`].
pub fn inspect_file(path: &Path) -> Result<FileStatus, ConfigError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileStatus::Missing),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Ok(match RootConfig::from_json_slice(&bytes) {
        Ok(config) => FileStatus::Valid(Box::new(config)),
        Err(DocumentError::Malformed(e)) => FileStatus::Malformed(e),
        Err(DocumentError::Invalid(e)) => FileStatus::Invalid(e),
    })
}

fn invalid_file(path: &Path, source: ValidationError) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    }
}

impl RootConfig {
    /// Loads the config from `paths`, falling back to the backup and then to
    /// defaults when the JSON on disk is malformed.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if the file that would be used parses as JSON
    /// but fails validation; [`ConfigError::Io`] for unexpected file system
    /// errors.  Malformed JSON is never an error.
    pub fn load_from(paths: &ConfigPaths) -> Result<LoadOutcome, ConfigError> {
        let parse_error = match inspect_file(&paths.primary)? {
            FileStatus::Missing => {
                info!(path = %paths.primary.display(), "no settings file, using base settings");
                return Ok(LoadOutcome {
                    config: RootConfig::default(),
                    source: ConfigSource::NotFound,
                });
            }
            FileStatus::Valid(config) => {
                return Ok(LoadOutcome {
                    config: *config,
                    source: ConfigSource::Primary,
                });
            }
            FileStatus::Malformed(e) => e,
            FileStatus::Invalid(e) => return Err(invalid_file(&paths.primary, e)),
        };

        warn!(
            path = %paths.primary.display(),
            error = %parse_error,
            "failed to load settings file"
        );

        match inspect_file(&paths.backup)? {
            FileStatus::Valid(config) => {
                info!(path = %paths.backup.display(), "using backup settings");
                return Ok(LoadOutcome {
                    config: *config,
                    source: ConfigSource::Backup,
                });
            }
            FileStatus::Invalid(e) => return Err(invalid_file(&paths.backup, e)),
            FileStatus::Missing | FileStatus::Malformed(_) => {}
        }

        info!("using base settings");
        Ok(LoadOutcome {
            config: RootConfig::default(),
            source: ConfigSource::Defaults,
        })
    }

    /// Loads the config from `paths`, discarding where it came from.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        Ok(Self::load_from(paths)?.config)
    }

    /// Loads from the conventional file names in the working directory.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&ConfigPaths::default())
    }

    /// Persists the config to `paths.primary`, first backing up the existing
    /// primary file if it is well-formed.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unsavable`] if `self` fails [`RootConfig::validate`];
    /// [`ConfigError::Invalid`] if the existing primary file parses as JSON
    /// but fails validation; [`ConfigError::Io`] for copy or write failures;
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn save_to(&self, paths: &ConfigPaths) -> Result<(), ConfigError> {
        self.validate().map_err(ConfigError::Unsavable)?;

        match inspect_file(&paths.primary)? {
            FileStatus::Valid(_) => {
                std::fs::copy(&paths.primary, &paths.backup).map_err(|source| {
                    ConfigError::Io {
                        path: paths.backup.clone(),
                        source,
                    }
                })?;
                debug!(path = %paths.backup.display(), "backed up settings file");
            }
            FileStatus::Malformed(e) => {
                debug!(error = %e, "existing settings file is malformed, skipping backup");
            }
            FileStatus::Invalid(e) => return Err(invalid_file(&paths.primary, e)),
            FileStatus::Missing => {}
        }

        let content = self.to_json_string()?;

        // Ensure the directory exists before writing.
        if let Some(dir) = paths.primary.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&paths.primary, content).map_err(|source| ConfigError::Io {
            path: paths.primary.clone(),
            source,
        })
    }

    /// Saves to the conventional file names in the working directory.
    ///
    /// # Errors
    ///
    /// See [`save_to`](Self::save_to).
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&ConfigPaths::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
