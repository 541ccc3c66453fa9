//! Global tracking, OSC and UI settings.
//!
//! The record holds every knob the GUI exposes outside the per-eye camera
//! panels.  Tracking algorithms are toggled independently by the `gui_<ALG>`
//! flags and ranked by the `gui_<ALG>P` priorities, where a lower number
//! means a higher priority.  Nothing here checks that the flags are mutually
//! consistent; that is the tracking pipeline's concern.
//!
//! The smoothing parameters `gui_min_cutoff` and `gui_speed_coefficient` are
//! stored as decimal strings so the GUI can round-trip exactly what the user
//! typed.  [`SettingsConfig::min_cutoff`] and
//! [`SettingsConfig::speed_coefficient`] parse them on demand.

use serde::{Deserialize, Serialize};

use super::{coerce, ValidationError};

/// Application-wide settings.
///
/// Field names map 1:1 onto the settings file keys; the upper-case
/// algorithm names are preserved on the wire through `serde(rename)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_flip_x_axis_left: bool,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_flip_x_axis_right: bool,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_flip_y_axis: bool,
    #[serde(rename = "gui_RANSAC3D", deserialize_with = "coerce::boolean")]
    pub gui_ransac3d: bool,
    #[serde(rename = "gui_HSF", deserialize_with = "coerce::boolean")]
    pub gui_hsf: bool,
    #[serde(rename = "gui_BLOB", deserialize_with = "coerce::boolean")]
    pub gui_blob: bool,
    #[serde(rename = "gui_BLINK", deserialize_with = "coerce::boolean")]
    pub gui_blink: bool,
    #[serde(rename = "gui_HSRAC", deserialize_with = "coerce::boolean")]
    pub gui_hsrac: bool,
    #[serde(rename = "gui_DADDY", deserialize_with = "coerce::boolean")]
    pub gui_daddy: bool,
    #[serde(rename = "gui_HSF_radius", deserialize_with = "coerce::int")]
    pub gui_hsf_radius: i32,
    /// One-euro filter minimum cutoff, as a decimal string.
    #[serde(deserialize_with = "coerce::string")]
    pub gui_min_cutoff: String,
    /// One-euro filter speed coefficient, as a decimal string.
    #[serde(deserialize_with = "coerce::string")]
    pub gui_speed_coefficient: String,
    /// Destination host for outgoing OSC messages.
    #[serde(deserialize_with = "coerce::string")]
    pub gui_osc_address: String,
    /// Destination UDP port for outgoing OSC messages.
    #[serde(deserialize_with = "coerce::int")]
    pub gui_osc_port: u16,
    /// Local UDP port for incoming OSC messages.
    #[serde(deserialize_with = "coerce::int")]
    pub gui_osc_receiver_port: u16,
    #[serde(deserialize_with = "coerce::string")]
    pub gui_osc_recenter_address: String,
    #[serde(deserialize_with = "coerce::string")]
    pub gui_osc_recalibrate_address: String,
    #[serde(deserialize_with = "coerce::float")]
    pub gui_blob_maxsize: f64,
    #[serde(deserialize_with = "coerce::float")]
    pub gui_blob_minsize: f64,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_recenter_eyes: bool,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_eye_falloff: bool,
    #[serde(deserialize_with = "coerce::int")]
    pub tracker_single_eye: i32,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_blink_sync: bool,
    #[serde(deserialize_with = "coerce::int")]
    pub gui_threshold: i32,
    #[serde(rename = "gui_HSRACP", deserialize_with = "coerce::int")]
    pub gui_hsracp: i32,
    #[serde(rename = "gui_HSFP", deserialize_with = "coerce::int")]
    pub gui_hsfp: i32,
    #[serde(rename = "gui_DADDYP", deserialize_with = "coerce::int")]
    pub gui_daddyp: i32,
    #[serde(rename = "gui_RANSAC3DP", deserialize_with = "coerce::int")]
    pub gui_ransac3dp: i32,
    #[serde(rename = "gui_BLOBP", deserialize_with = "coerce::int")]
    pub gui_blobp: i32,
    #[serde(rename = "gui_IBO", deserialize_with = "coerce::boolean")]
    pub gui_ibo: bool,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_skip_autoradius: bool,
    #[serde(deserialize_with = "coerce::int")]
    pub gui_thresh_add: i32,
    #[serde(deserialize_with = "coerce::boolean")]
    pub gui_update_check: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            gui_flip_x_axis_left: false,
            gui_flip_x_axis_right: false,
            gui_flip_y_axis: false,
            gui_ransac3d: false,
            gui_hsf: false,
            gui_blob: false,
            gui_blink: false,
            gui_hsrac: true,
            gui_daddy: false,
            gui_hsf_radius: 15,
            gui_min_cutoff: "0.0004".to_string(),
            gui_speed_coefficient: "0.9".to_string(),
            gui_osc_address: "127.0.0.1".to_string(),
            gui_osc_port: 9000,
            gui_osc_receiver_port: 9001,
            gui_osc_recenter_address: "/avatar/parameters/etvr_recenter".to_string(),
            gui_osc_recalibrate_address: "/avatar/parameters/etvr_recalibrate".to_string(),
            gui_blob_maxsize: 25.0,
            gui_blob_minsize: 10.0,
            gui_recenter_eyes: false,
            gui_eye_falloff: false,
            tracker_single_eye: 0,
            gui_blink_sync: false,
            gui_threshold: 65,
            gui_hsracp: 1,
            gui_hsfp: 2,
            gui_daddyp: 3,
            gui_ransac3dp: 4,
            gui_blobp: 5,
            gui_ibo: true,
            gui_skip_autoradius: true,
            gui_thresh_add: 20,
            gui_update_check: false,
        }
    }
}

/// Pupil / eye tracking algorithms selectable from the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingAlgorithm {
    Hsrac,
    Hsf,
    Daddy,
    Ransac3d,
    Blob,
    Blink,
}

impl TrackingAlgorithm {
    /// All algorithms, in default priority order (Blink last: it has no priority).
    pub const ALL: [TrackingAlgorithm; 6] = [
        TrackingAlgorithm::Hsrac,
        TrackingAlgorithm::Hsf,
        TrackingAlgorithm::Daddy,
        TrackingAlgorithm::Ransac3d,
        TrackingAlgorithm::Blob,
        TrackingAlgorithm::Blink,
    ];

    /// Name used in the settings keys (`gui_<NAME>` / `gui_<NAME>P`).
    pub fn wire_name(self) -> &'static str {
        match self {
            TrackingAlgorithm::Hsrac => "HSRAC",
            TrackingAlgorithm::Hsf => "HSF",
            TrackingAlgorithm::Daddy => "DADDY",
            TrackingAlgorithm::Ransac3d => "RANSAC3D",
            TrackingAlgorithm::Blob => "BLOB",
            TrackingAlgorithm::Blink => "BLINK",
        }
    }
}

impl std::fmt::Display for TrackingAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl SettingsConfig {
    /// Parses `gui_min_cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Decimal`] if the stored string is not a number.
    pub fn min_cutoff(&self) -> Result<f64, ValidationError> {
        parse_decimal("gui_min_cutoff", &self.gui_min_cutoff)
    }

    /// Parses `gui_speed_coefficient`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Decimal`] if the stored string is not a number.
    pub fn speed_coefficient(&self) -> Result<f64, ValidationError> {
        parse_decimal("gui_speed_coefficient", &self.gui_speed_coefficient)
    }

    /// Checks that every value can be written to the settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFinite`] for a NaN or infinite blob size,
    /// which JSON cannot represent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("settings.gui_blob_maxsize", self.gui_blob_maxsize),
            ("settings.gui_blob_minsize", self.gui_blob_minsize),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Whether the `gui_<ALG>` flag for `algorithm` is set.
    pub fn is_enabled(&self, algorithm: TrackingAlgorithm) -> bool {
        match algorithm {
            TrackingAlgorithm::Hsrac => self.gui_hsrac,
            TrackingAlgorithm::Hsf => self.gui_hsf,
            TrackingAlgorithm::Daddy => self.gui_daddy,
            TrackingAlgorithm::Ransac3d => self.gui_ransac3d,
            TrackingAlgorithm::Blob => self.gui_blob,
            TrackingAlgorithm::Blink => self.gui_blink,
        }
    }

    /// The `gui_<ALG>P` priority, or `None` for algorithms without one.
    pub fn priority(&self, algorithm: TrackingAlgorithm) -> Option<i32> {
        match algorithm {
            TrackingAlgorithm::Hsrac => Some(self.gui_hsracp),
            TrackingAlgorithm::Hsf => Some(self.gui_hsfp),
            TrackingAlgorithm::Daddy => Some(self.gui_daddyp),
            TrackingAlgorithm::Ransac3d => Some(self.gui_ransac3dp),
            TrackingAlgorithm::Blob => Some(self.gui_blobp),
            TrackingAlgorithm::Blink => None,
        }
    }

    /// Enabled algorithms that carry a priority, highest priority (lowest
    /// number) first.  Equal priorities keep [`TrackingAlgorithm::ALL`] order.
    pub fn prioritized_algorithms(&self) -> Vec<TrackingAlgorithm> {
        let mut ranked: Vec<(i32, TrackingAlgorithm)> = TrackingAlgorithm::ALL
            .into_iter()
            .filter(|alg| self.is_enabled(*alg))
            .filter_map(|alg| self.priority(alg).map(|p| (p, alg)))
            .collect();
        // Stable sort keeps declaration order for ties.
        ranked.sort_by_key(|(priority, _)| *priority);
        ranked.into_iter().map(|(_, alg)| alg).collect()
    }
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::Decimal {
            field,
            value: value.to_string(),
        })
}
