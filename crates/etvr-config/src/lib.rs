//! # etvr-config
//!
//! Persisted configuration for the EyeTrackVR application: per-eye camera
//! settings, global tracking/UI settings, and the load/save routines that keep
//! a single-generation backup of the settings file.
//!
//! # Architecture overview
//!
//! - **`domain`** – The configuration schema.  Plain data records with
//!   documented defaults and an explicit construct-from-JSON function
//!   ([`RootConfig::from_value`]).  No file system access.
//!
//! - **`infrastructure::storage`** – Reads and writes the settings file pair
//!   (`eyetrack_settings.json` / `eyetrack_settings.backup`), falling back
//!   from the primary file to the backup and then to defaults when the JSON
//!   on disk is malformed.
//!
//! ```no_run
//! use etvr_config::{ConfigPaths, RootConfig};
//!
//! # fn main() -> Result<(), etvr_config::ConfigError> {
//! let paths = ConfigPaths::default();
//! let mut config = RootConfig::load(&paths)?;
//! config.settings.gui_threshold = 70;
//! config.save_to(&paths)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod infrastructure;

// Re-export the most-used types at the crate root so callers can write
// `etvr_config::RootConfig` instead of `etvr_config::domain::root::RootConfig`.
pub use domain::camera::CameraConfig;
pub use domain::capture_source::CaptureSource;
pub use domain::eye::{EyeId, UnknownEyeId};
pub use domain::root::{DocumentError, RootConfig};
pub use domain::settings::{SettingsConfig, TrackingAlgorithm};
pub use domain::ValidationError;
pub use infrastructure::storage::config::{
    inspect_file, ConfigError, ConfigPaths, ConfigSource, FileStatus, LoadOutcome,
    BACKUP_CONFIG_FILE_NAME, CONFIG_FILE_NAME,
};
