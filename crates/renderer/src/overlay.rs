//! Marker overlays (stations, sources, mesh nodes) drawn over a rendered
//! field.
//!
//! Markers never change the plot's color mapping or axis limits; anything
//! outside the data box is clipped away.

use std::path::Path;

use field_common::{FieldError, FieldResult};
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use crate::colormap::Color;
use crate::plot::RenderedPlot;

/// Column layout of an overlay text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFormat {
    /// `name network x z ...`: label from column 0, position from 2 and 3.
    Stations,
    /// `x y ...`: position from columns 0 and 1.
    TwoColumn,
}

impl OverlayFormat {
    fn min_columns(self) -> usize {
        match self {
            OverlayFormat::Stations => 4,
            OverlayFormat::TwoColumn => 2,
        }
    }
}

/// A single marker position with an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

/// Markers read from one overlay file.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySet {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl OverlaySet {
    /// Read and parse an overlay file.
    pub fn read(path: impl AsRef<Path>, format: OverlayFormat) -> FieldResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FieldError::ParseError {
            path: path.display().to_string(),
            line: 0,
            message: format!("cannot read overlay file: {}", e),
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let set = Self::parse(&name, &content, format)?;
        debug!(path = %path.display(), markers = set.markers.len(), "Loaded overlay");
        Ok(set)
    }

    /// Parse whitespace-delimited overlay rows. Blank lines and `#`
    /// comments are skipped; `name` is used in error messages.
    pub fn parse(name: &str, content: &str, format: OverlayFormat) -> FieldResult<Self> {
        let mut markers = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let parse_error = |message: String| FieldError::ParseError {
                path: name.to_string(),
                line: idx + 1,
                message,
            };

            if fields.len() < format.min_columns() {
                return Err(parse_error(format!(
                    "expected at least {} columns, found {}",
                    format.min_columns(),
                    fields.len()
                )));
            }

            let number = |col: usize| -> FieldResult<f64> {
                fields[col].parse::<f64>().map_err(|_| {
                    parse_error(format!("column {} is not a number: '{}'", col, fields[col]))
                })
            };

            let marker = match format {
                OverlayFormat::Stations => Marker {
                    x: number(2)?,
                    y: number(3)?,
                    label: Some(fields[0].to_string()),
                },
                OverlayFormat::TwoColumn => Marker {
                    x: number(0)?,
                    y: number(1)?,
                    label: None,
                },
            };
            markers.push(marker);
        }

        Ok(Self {
            name: name.to_string(),
            markers,
        })
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker positions as `(x, y)` pairs.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.markers.iter().map(|m| (m.x, m.y)).collect()
    }
}

/// Glyph drawn at each marker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Dot,
    /// Triangle with its apex pointing down.
    InvertedTriangle,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Marker size in pixels (circumscribed diameter).
    pub size: f32,
    pub fill: Color,
    pub edge: Option<Color>,
    pub edge_width: f32,
}

impl MarkerStyle {
    /// Receiver stations.
    pub fn station() -> Self {
        Self {
            shape: MarkerShape::InvertedTriangle,
            size: 12.0,
            fill: Color::rgb(255, 255, 255),
            edge: Some(Color::BLACK),
            edge_width: 1.0,
        }
    }

    /// Sources.
    pub fn source() -> Self {
        Self {
            shape: MarkerShape::Star,
            size: 16.0,
            fill: Color::rgb(214, 39, 40),
            edge: Some(Color::BLACK),
            edge_width: 1.0,
        }
    }

    /// Mesh sample points.
    pub fn node() -> Self {
        Self {
            shape: MarkerShape::Dot,
            size: 2.0,
            fill: Color::BLACK,
            edge: None,
            edge_width: 0.0,
        }
    }
}

fn marker_path(shape: MarkerShape, cx: f32, cy: f32, size: f32) -> Option<tiny_skia::Path> {
    let r = size / 2.0;
    match shape {
        MarkerShape::Dot => PathBuilder::from_circle(cx, cy, r.max(0.5)),
        MarkerShape::InvertedTriangle => {
            let half_w = r * 0.866;
            let mut pb = PathBuilder::new();
            pb.move_to(cx - half_w, cy - r / 2.0);
            pb.line_to(cx + half_w, cy - r / 2.0);
            pb.line_to(cx, cy + r);
            pb.close();
            pb.finish()
        }
        MarkerShape::Star => {
            let inner = r * 0.4;
            let mut pb = PathBuilder::new();
            for i in 0..10 {
                let radius = if i % 2 == 0 { r } else { inner };
                let angle = std::f32::consts::PI * i as f32 / 5.0 - std::f32::consts::FRAC_PI_2;
                let (px, py) = (cx + radius * angle.cos(), cy + radius * angle.sin());
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
            pb.finish()
        }
    }
}

/// Mask covering the plot's data box.
fn data_mask(plot: &RenderedPlot) -> Option<Mask> {
    let rect = plot.viewport().data_rect().to_skia()?;
    let mut mask = Mask::new(plot.width(), plot.height())?;
    mask.fill_path(
        &PathBuilder::from_rect(rect),
        FillRule::Winding,
        false,
        Transform::identity(),
    );
    Some(mask)
}

fn draw_marker(pixmap: &mut Pixmap, path: &tiny_skia::Path, style: &MarkerStyle, mask: Option<&Mask>) {
    let mut paint = Paint::default();
    paint.set_color(style.fill.to_skia());
    paint.anti_alias = true;
    pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), mask);

    if let Some(edge) = style.edge {
        let mut stroke_paint = Paint::default();
        stroke_paint.set_color(edge.to_skia());
        stroke_paint.anti_alias = true;
        let stroke = Stroke {
            width: style.edge_width,
            ..Stroke::default()
        };
        pixmap.stroke_path(path, &stroke_paint, &stroke, Transform::identity(), mask);
    }
}

/// Draw markers at data coordinates over a rendered plot.
///
/// Points outside the data box or with non-finite coordinates are skipped.
/// Returns the number of markers drawn.
pub fn scatter(plot: &mut RenderedPlot, points: &[(f64, f64)], style: &MarkerStyle) -> usize {
    let mask = data_mask(plot);
    let bounds = *plot.viewport().bounds();
    let viewport = *plot.viewport();

    let mut drawn = 0;
    for &(x, y) in points {
        if !x.is_finite() || !y.is_finite() || !bounds.contains(x, y) {
            continue;
        }
        let (px, py) = viewport.to_pixel(x, y);
        if let Some(path) = marker_path(style.shape, px, py, style.size) {
            draw_marker(plot.pixmap_mut(), &path, style, mask.as_ref());
            drawn += 1;
        }
    }
    drawn
}
