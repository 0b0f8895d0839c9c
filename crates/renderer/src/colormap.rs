//! Named colormaps for scalar fields.
//!
//! A colormap is a list of color stops over `[0, 1]`; lookups interpolate
//! linearly between neighbouring stops. Built-in maps follow the common
//! scientific palettes (`viridis`, `seismic`, `jet`, ...). Any name may take
//! an `_r` suffix to reverse the map.

use field_common::{FieldError, FieldResult};

use crate::calibrate::ColorLimits;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::rgb(r, g, b))
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Built-in palettes as evenly spaced hex stops.
const BUILTIN: &[(&str, &[&str])] = &[
    (
        "viridis",
        &[
            "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779",
            "#6ece58", "#b5de2b", "#fde725",
        ],
    ),
    (
        "magma",
        &[
            "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f", "#cd4071", "#f1605d",
            "#fd9668", "#feca8d", "#fcfdbf",
        ],
    ),
    (
        "inferno",
        &[
            "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925",
            "#fb9b06", "#f7d13d", "#fcffa4",
        ],
    ),
    (
        "plasma",
        &[
            "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953",
            "#fb9f3a", "#fdca26", "#f0f921",
        ],
    ),
    ("seismic", &["#00004c", "#0000ff", "#ffffff", "#ff0000", "#7f0000"]),
    ("bwr", &["#0000ff", "#ffffff", "#ff0000"]),
    (
        "coolwarm",
        &["#3b4cc0", "#6f92f3", "#aac7fd", "#dddcdc", "#f7b89c", "#e7745b", "#b40426"],
    ),
    (
        "rdbu",
        &[
            "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0",
            "#92c5de", "#4393c3", "#2166ac", "#053061",
        ],
    ),
    ("gray", &["#000000", "#ffffff"]),
];

/// Palettes whose stops are not evenly spaced.
const BUILTIN_POSITIONED: &[(&str, &[(f32, &str)])] = &[
    (
        "jet",
        &[
            (0.0, "#00007f"),
            (0.125, "#0000ff"),
            (0.375, "#00ffff"),
            (0.625, "#ffff00"),
            (0.875, "#ff0000"),
            (1.0, "#7f0000"),
        ],
    ),
    (
        "hot",
        &[
            (0.0, "#0b0000"),
            (0.365, "#ff0000"),
            (0.746, "#ffff00"),
            (1.0, "#ffffff"),
        ],
    ),
];

/// A palette mapping `[0, 1]` onto colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<(f32, Color)>,
}

impl Colormap {
    /// Build a colormap from `(position, color)` stops.
    ///
    /// Positions may use any scale; they are sorted and rescaled to `[0, 1]`.
    pub fn from_stops(name: impl Into<String>, mut stops: Vec<(f32, Color)>) -> FieldResult<Self> {
        let name = name.into();
        if stops.len() < 2 {
            return Err(FieldError::invalid(
                "colormap",
                format!("'{}' needs at least two color stops", name),
            ));
        }
        if stops.iter().any(|(pos, _)| !pos.is_finite()) {
            return Err(FieldError::invalid(
                "colormap",
                format!("'{}' has a non-finite stop position", name),
            ));
        }

        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let first = stops[0].0;
        let last = stops[stops.len() - 1].0;
        let span = last - first;
        if !(span > 0.0) {
            return Err(FieldError::invalid(
                "colormap",
                format!("'{}' stops must span a non-empty range", name),
            ));
        }

        let stops = stops
            .into_iter()
            .map(|(pos, color)| ((pos - first) / span, color))
            .collect();
        Ok(Self { name, stops })
    }

    /// Build a colormap from evenly spaced colors.
    pub fn from_colors(name: impl Into<String>, colors: &[Color]) -> FieldResult<Self> {
        let n = colors.len().max(2) - 1;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f32 / n as f32, c))
            .collect();
        Self::from_stops(name, stops)
    }

    /// Look up a built-in colormap. Names are case-insensitive and accept
    /// an `_r` suffix for the reversed map.
    pub fn by_name(name: &str) -> FieldResult<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let (base, reversed) = match lower.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };

        let map = Self::builtin(base).ok_or_else(|| {
            FieldError::invalid(
                "cmap",
                format!(
                    "unknown colormap '{}' (available: {})",
                    name,
                    Self::available().join(", ")
                ),
            )
        })??;

        Ok(if reversed { map.reversed() } else { map })
    }

    fn builtin(base: &str) -> Option<FieldResult<Self>> {
        let parse = |hex: &str| {
            Color::from_hex(hex).ok_or_else(|| {
                FieldError::invalid("colormap", format!("invalid built-in color '{}'", hex))
            })
        };

        if let Some((name, hexes)) = BUILTIN.iter().find(|(n, _)| *n == base) {
            return Some(
                hexes
                    .iter()
                    .map(|h| parse(h))
                    .collect::<FieldResult<Vec<_>>>()
                    .and_then(|colors| Self::from_colors(*name, &colors)),
            );
        }

        BUILTIN_POSITIONED
            .iter()
            .find(|(n, _)| *n == base)
            .map(|(name, stops)| {
                stops
                    .iter()
                    .map(|(pos, h)| parse(h).map(|c| (*pos, c)))
                    .collect::<FieldResult<Vec<_>>>()
                    .and_then(|stops| Self::from_stops(*name, stops))
            })
    }

    /// Names of every built-in colormap.
    pub fn available() -> Vec<&'static str> {
        BUILTIN
            .iter()
            .map(|(n, _)| *n)
            .chain(BUILTIN_POSITIONED.iter().map(|(n, _)| *n))
            .collect()
    }

    /// Same palette, running the other way.
    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_string(),
            None => format!("{}_r", self.name),
        };
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|&(pos, color)| (1.0 - pos, color))
            .collect();
        Self { name, stops }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[(f32, Color)] {
        &self.stops
    }

    /// Color at normalized position `t` (clamped to `[0, 1]`).
    ///
    /// NaN maps to transparent.
    pub fn at(&self, t: f32) -> Color {
        if t.is_nan() {
            return Color::transparent();
        }
        let t = t.clamp(0.0, 1.0);

        let upper = self
            .stops
            .iter()
            .position(|&(pos, _)| pos >= t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            return self.stops[0].1;
        }

        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let span = p1 - p0;
        if span <= 0.0 {
            return c1;
        }
        interpolate_color(c0, c1, (t - p0) / span)
    }

    /// Color for a data value under the given limits.
    pub fn map(&self, value: f32, limits: &ColorLimits) -> Color {
        if value.is_nan() {
            return Color::transparent();
        }
        self.at(limits.normalize(value))
    }
}
