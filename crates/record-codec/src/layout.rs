//! On-disk layout options.

use serde::{Deserialize, Serialize};

/// Width of one stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 4-byte IEEE float (`real(4)`).
    #[default]
    Single,
    /// 8-byte IEEE float (`real(8)`), narrowed to `f32` on decode.
    Double,
}

impl Precision {
    pub fn element_size(&self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }
}

/// Byte order of markers and samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// How samples are grouped in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// Marker-delimited records; malformed markers are errors.
    #[default]
    Sequential,
    /// Headerless stream of samples.
    Raw,
    /// Sequential when the markers frame the whole file, raw otherwise.
    Auto,
}

/// Complete description of a record file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordLayout {
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub endian: Endian,
    #[serde(default)]
    pub framing: Framing,
}

impl RecordLayout {
    pub fn new(precision: Precision, endian: Endian, framing: Framing) -> Self {
        Self {
            precision,
            endian,
            framing,
        }
    }
}
