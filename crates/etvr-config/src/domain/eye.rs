//! Eye / view selector shared with the OSC and GUI layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selects which eye (or which auxiliary view) the UI displays.
///
/// Serialized as its integer discriminant, so `"eye_display_id": 0` in the
/// settings file means [`EyeId::Right`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(u8)]
pub enum EyeId {
    #[default]
    Right = 0,
    Left = 1,
    Both = 2,
    Settings = 3,
    AlgoSettings = 4,
}

/// An integer that does not name any [`EyeId`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown eye id {0}, expected 0..=4")]
pub struct UnknownEyeId(pub i64);

impl EyeId {
    /// All variants in discriminant order.
    pub const ALL: [EyeId; 5] = [
        EyeId::Right,
        EyeId::Left,
        EyeId::Both,
        EyeId::Settings,
        EyeId::AlgoSettings,
    ];

    /// Returns `Some(self)` for the two camera-backed eyes and `None` for the
    /// combined and settings views.
    pub fn camera_side(self) -> Option<EyeId> {
        match self {
            EyeId::Right | EyeId::Left => Some(self),
            _ => None,
        }
    }

    /// Upper-case name as used by the OSC layer (`"RIGHT"`, `"ALGOSETTINGS"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            EyeId::Right => "RIGHT",
            EyeId::Left => "LEFT",
            EyeId::Both => "BOTH",
            EyeId::Settings => "SETTINGS",
            EyeId::AlgoSettings => "ALGOSETTINGS",
        }
    }
}

impl TryFrom<i64> for EyeId {
    type Error = UnknownEyeId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EyeId::Right),
            1 => Ok(EyeId::Left),
            2 => Ok(EyeId::Both),
            3 => Ok(EyeId::Settings),
            4 => Ok(EyeId::AlgoSettings),
            other => Err(UnknownEyeId(other)),
        }
    }
}

impl From<EyeId> for i64 {
    fn from(id: EyeId) -> Self {
        id as i64
    }
}

impl std::fmt::Display for EyeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
