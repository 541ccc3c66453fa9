//! Camera capture source: a device index, a URI/path, or nothing.
//!
//! JSON has no union type, so the settings file stores this as an integer, a
//! string, or `null`.  Decoding precedence:
//!
//! | JSON value                      | Decoded as                  |
//! |---------------------------------|-----------------------------|
//! | `null`                          | [`CaptureSource::Unset`]    |
//! | integer                         | [`CaptureSource::DeviceIndex`] |
//! | string holding an integer       | [`CaptureSource::DeviceIndex`] |
//! | any other string                | [`CaptureSource::SourcePath`]  |
//! | finite float                    | [`CaptureSource::DeviceIndex`] (truncated) |
//! | bool                            | [`CaptureSource::DeviceIndex`] (0 or 1) |
//! | array, object, non-finite float | error                       |

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Where a camera's frames come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureSource {
    /// No source configured.
    #[default]
    Unset,
    /// Local capture device index (e.g. `0` for the first webcam).
    DeviceIndex(i64),
    /// Stream URI or file path (e.g. `http://192.168.1.20:4442`).
    SourcePath(String),
}

impl CaptureSource {
    /// Interprets user-entered text: blank is [`Unset`](Self::Unset), an
    /// integer is a [`DeviceIndex`](Self::DeviceIndex), anything else a
    /// [`SourcePath`](Self::SourcePath).
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return CaptureSource::Unset;
        }
        Self::from_string(text)
    }

    /// Returns `true` unless the source is [`Unset`](Self::Unset).
    pub fn is_set(&self) -> bool {
        !matches!(self, CaptureSource::Unset)
    }

    /// Applies the integer-first rule to a string value from the settings file.
    fn from_string(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(index) => CaptureSource::DeviceIndex(index),
            Err(_) => CaptureSource::SourcePath(text.to_string()),
        }
    }
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::Unset => f.write_str("<unset>"),
            CaptureSource::DeviceIndex(index) => write!(f, "{index}"),
            CaptureSource::SourcePath(path) => f.write_str(path),
        }
    }
}

impl From<i64> for CaptureSource {
    fn from(index: i64) -> Self {
        CaptureSource::DeviceIndex(index)
    }
}

impl Serialize for CaptureSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CaptureSource::Unset => serializer.serialize_none(),
            CaptureSource::DeviceIndex(index) => serializer.serialize_i64(*index),
            CaptureSource::SourcePath(path) => serializer.serialize_str(path),
        }
    }
}

struct CaptureSourceVisitor;

impl<'de> Visitor<'de> for CaptureSourceVisitor {
    type Value = CaptureSource;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer device index, a source string, or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CaptureSource::Unset)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CaptureSource::Unset)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(CaptureSourceVisitor)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(CaptureSource::DeviceIndex(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(CaptureSource::DeviceIndex)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Ok(CaptureSource::DeviceIndex(value.trunc() as i64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(CaptureSource::DeviceIndex(i64::from(value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(CaptureSource::from_string(value))
    }
}

impl<'de> Deserialize<'de> for CaptureSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CaptureSourceVisitor)
    }
}
