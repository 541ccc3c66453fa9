//! Per-eye camera calibration and capture settings.

use serde::{Deserialize, Serialize};

use super::capture_source::CaptureSource;
use super::coerce;

fn default_focal_length() -> i32 {
    30
}

/// Camera settings for one eye.
///
/// Every field is optional in the settings file; absent fields take the
/// defaults below.  No cross-field constraints are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Image rotation in degrees.
    #[serde(default, deserialize_with = "coerce::int")]
    pub rotation_angle: i32,
    /// Region-of-interest rectangle, in source-frame pixels.
    #[serde(default, deserialize_with = "coerce::int")]
    pub roi_window_x: i32,
    #[serde(default, deserialize_with = "coerce::int")]
    pub roi_window_y: i32,
    #[serde(default, deserialize_with = "coerce::int")]
    pub roi_window_w: i32,
    #[serde(default, deserialize_with = "coerce::int")]
    pub roi_window_h: i32,
    #[serde(default = "default_focal_length", deserialize_with = "coerce::int")]
    pub focal_length: i32,
    #[serde(default)]
    pub capture_source: CaptureSource,
    #[serde(default, deserialize_with = "coerce::boolean")]
    pub gui_circular_crop: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            rotation_angle: 0,
            roi_window_x: 0,
            roi_window_y: 0,
            roi_window_w: 0,
            roi_window_h: 0,
            focal_length: default_focal_length(),
            capture_source: CaptureSource::Unset,
            gui_circular_crop: false,
        }
    }
}

impl CameraConfig {
    /// Returns `true` once a region of interest with positive area has been selected.
    pub fn has_roi(&self) -> bool {
        self.roi_window_w > 0 && self.roi_window_h > 0
    }
}
