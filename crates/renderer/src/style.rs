//! Colormap style files.
//!
//! Custom palettes can be supplied as JSON:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "styles": {
//!     "velocity": {
//!       "name": "velocity",
//!       "stops": [
//!         { "value": 1500.0, "color": "#2166ac" },
//!         { "value": 3000.0, "color": "#f7f7f7" },
//!         { "value": 4500.0, "color": "#b2182b" }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Stop values set the relative spacing of the colors; the absolute values
//! are rescaled onto the calibrated color limits.

use std::collections::HashMap;
use std::path::Path;

use field_common::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

use crate::colormap::{Color, Colormap};

/// Style configuration loaded from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    pub version: String,
    pub styles: HashMap<String, StyleDefinition>,
}

/// A single style definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleDefinition {
    pub name: String,
    pub description: Option<String>,
    pub stops: Vec<ColorStop>,
}

/// Color stop for gradient
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: String,
    pub label: Option<String>,
}

impl StyleConfig {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Load style configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FieldResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FieldError::Config(format!("cannot read style file {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| {
            FieldError::Config(format!("invalid style file {}: {}", path.display(), e))
        })
    }

    /// Get a specific style definition
    pub fn get_style(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    /// The only style, or the one named `default`.
    pub fn get_default_style(&self) -> Option<(&String, &StyleDefinition)> {
        if self.styles.len() == 1 {
            return self.styles.iter().next();
        }
        self.styles.get_key_value("default")
    }

    /// Resolve a style (by name, or the default one) into a colormap.
    pub fn colormap(&self, name: Option<&str>) -> FieldResult<Colormap> {
        let style = match name {
            Some(name) => self.get_style(name),
            None => self.get_default_style().map(|(_, s)| s),
        }
        .ok_or_else(|| {
            FieldError::invalid(
                "style",
                format!(
                    "style '{}' not found (available: {})",
                    name.unwrap_or("default"),
                    self.styles.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            )
        })?;
        style.to_colormap()
    }
}

impl StyleDefinition {
    pub fn to_colormap(&self) -> FieldResult<Colormap> {
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                Color::from_hex(&stop.color).map(|c| (stop.value, c)).ok_or_else(|| {
                    FieldError::invalid(
                        "style",
                        format!("style '{}' has invalid color '{}'", self.name, stop.color),
                    )
                })
            })
            .collect::<FieldResult<Vec<_>>>()?;
        Colormap::from_stops(self.name.clone(), stops)
    }
}
