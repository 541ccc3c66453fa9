//! The persisted root document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::camera::CameraConfig;
use super::coerce;
use super::eye::EyeId;
use super::settings::SettingsConfig;
use super::{json_type_name, ValidationError};

/// Schema version written to new settings files.
pub const CURRENT_VERSION: i32 = 1;

fn default_version() -> i32 {
    CURRENT_VERSION
}

/// Why a settings document could not be turned into a [`RootConfig`].
///
/// The two cases are handled differently by the loader: malformed JSON falls
/// back to the backup file, a schema violation does not.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The bytes are not syntactically valid JSON.
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The JSON is well-formed but does not match the settings schema.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Complete application configuration, as stored in `eyetrack_settings.json`.
///
/// Built from defaults, from the primary settings file, or from its backup,
/// and then kept in memory as the single source of truth.  The GUI mutates it
/// in place and persists it wholesale with
/// [`save_to`](RootConfig::save_to).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    /// Schema version.  Stored but not used for migration.
    #[serde(default = "default_version", deserialize_with = "coerce::int")]
    pub version: i32,
    #[serde(default)]
    pub right_eye: CameraConfig,
    #[serde(default)]
    pub left_eye: CameraConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Which eye's image the UI displays.
    #[serde(default)]
    pub eye_display_id: EyeId,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            right_eye: CameraConfig::default(),
            left_eye: CameraConfig::default(),
            settings: SettingsConfig::default(),
            eye_display_id: EyeId::default(),
        }
    }
}

impl RootConfig {
    /// Validates a parsed JSON value and builds a config from it.
    ///
    /// Missing keys take their defaults and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAnObject`] if `value` is not a JSON
    /// object, and [`ValidationError::Field`] if any field has the wrong type
    /// (including `null` for a non-optional field).
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::NotAnObject {
                found: json_type_name(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parses and validates raw settings file bytes.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Malformed`] for invalid JSON (including invalid
    /// UTF-8), [`DocumentError::Invalid`] for schema violations.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(DocumentError::Malformed)?;
        match Self::from_value(value) {
            Err(ValidationError::Field(e)) => {
                // Decoding a `Value` loses source positions; redo the failing
                // pass on the bytes so the error points at the offending line.
                let positioned = serde_json::from_slice::<RootConfig>(bytes).err();
                Err(ValidationError::Field(positioned.unwrap_or(e)).into())
            }
            other => Ok(other?),
        }
    }

    /// Parses and validates a settings document held in a string.
    ///
    /// # Errors
    ///
    /// See [`from_json_slice`](Self::from_json_slice).
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Self::from_json_slice(text.as_bytes())
    }

    /// Checks that the config can be written and read back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFinite`] if a floating-point setting is
    /// NaN or infinite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.settings.validate()
    }

    /// Serializes to the compact form written to disk.
    ///
    /// # Errors
    ///
    /// Propagates any `serde_json` serialization failure.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to an indented form for display.
    ///
    /// # Errors
    ///
    /// Propagates any `serde_json` serialization failure.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The camera settings for `eye`, or `None` for non-camera views.
    pub fn camera(&self, eye: EyeId) -> Option<&CameraConfig> {
        match eye {
            EyeId::Right => Some(&self.right_eye),
            EyeId::Left => Some(&self.left_eye),
            _ => None,
        }
    }

    /// Mutable variant of [`camera`](Self::camera).
    pub fn camera_mut(&mut self, eye: EyeId) -> Option<&mut CameraConfig> {
        match eye {
            EyeId::Right => Some(&mut self.right_eye),
            EyeId::Left => Some(&mut self.left_eye),
            _ => None,
        }
    }
}
