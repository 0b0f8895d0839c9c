//! Color bar for a rendered plot's mappable.

use std::fmt;
use std::str::FromStr;

use field_common::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::colormap::Color;
use crate::plot::Mappable;
use crate::ticks::{format_tick, nice_ticks};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorbarOrientation {
    #[default]
    Vertical,
    Horizontal,
}

impl fmt::Display for ColorbarOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorbarOrientation::Vertical => write!(f, "vertical"),
            ColorbarOrientation::Horizontal => write!(f, "horizontal"),
        }
    }
}

impl FromStr for ColorbarOrientation {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" | "v" => Ok(ColorbarOrientation::Vertical),
            "horizontal" | "h" => Ok(ColorbarOrientation::Horizontal),
            other => Err(FieldError::invalid(
                "colorbar-orientation",
                format!("expected vertical or horizontal, got '{}'", other),
            )),
        }
    }
}

/// A tick on the color bar. `offset` is measured in pixels from the low
/// end of the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorbarTick {
    pub offset: f32,
    pub label: String,
}

/// Rasterized color bar plus its tick positions.
#[derive(Debug, Clone)]
pub struct Colorbar {
    pub pixmap: Pixmap,
    pub orientation: ColorbarOrientation,
    pub ticks: Vec<ColorbarTick>,
}

impl Colorbar {
    /// Length of the bar along its axis, in pixels.
    pub fn length(&self) -> u32 {
        match self.orientation {
            ColorbarOrientation::Vertical => self.pixmap.height(),
            ColorbarOrientation::Horizontal => self.pixmap.width(),
        }
    }
}

/// Draw a color bar `length` pixels long and `thickness` pixels wide.
///
/// The low end sits at the bottom (vertical) or left (horizontal).
pub fn draw_colorbar(
    mappable: &Mappable,
    orientation: ColorbarOrientation,
    length: u32,
    thickness: u32,
) -> FieldResult<Colorbar> {
    let (width, height) = match orientation {
        ColorbarOrientation::Vertical => (thickness, length),
        ColorbarOrientation::Horizontal => (length, thickness),
    };
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        FieldError::invalid(
            "colorbar",
            format!("invalid color bar size {}x{}", width, height),
        )
    })?;

    let limits = mappable.limits;
    let mut paint = Paint::default();
    paint.anti_alias = false;

    for step in 0..length {
        // Sample the middle of each pixel along the bar.
        let t = (step as f32 + 0.5) / length as f32;
        let value = limits.low + t * limits.span();
        paint.set_color(mappable.color_for(value).to_skia());

        let rect = match orientation {
            ColorbarOrientation::Vertical => {
                Rect::from_xywh(0.0, (length - 1 - step) as f32, thickness as f32, 1.0)
            }
            ColorbarOrientation::Horizontal => {
                Rect::from_xywh(step as f32, 0.0, 1.0, thickness as f32)
            }
        };
        if let Some(rect) = rect {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    outline(&mut pixmap);

    Ok(Colorbar {
        pixmap,
        orientation,
        ticks: ticks_for(mappable, length),
    })
}

fn outline(pixmap: &mut Pixmap) {
    let Some(rect) = Rect::from_xywh(
        0.5,
        0.5,
        pixmap.width() as f32 - 1.0,
        pixmap.height() as f32 - 1.0,
    ) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(Color::BLACK.to_skia());
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    pixmap.stroke_path(
        &PathBuilder::from_rect(rect),
        &paint,
        &stroke,
        Transform::identity(),
        None,
    );
}

fn ticks_for(mappable: &Mappable, length: u32) -> Vec<ColorbarTick> {
    let limits = mappable.limits;
    let values = nice_ticks(limits.low as f64, limits.high as f64, 5);
    let step = match values.as_slice() {
        [a, b, ..] => b - a,
        _ => limits.span() as f64,
    };

    values
        .into_iter()
        .map(|value| ColorbarTick {
            offset: limits.normalize(value as f32) * length as f32,
            label: format_tick(value, step),
        })
        .collect()
}
