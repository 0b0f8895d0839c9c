//! Text drawing for titles and tick labels.
//!
//! With a TrueType font, labels are rasterized through `imageproc`. Without
//! one, numeric labels still get simple stroked segment glyphs; anything
//! else is skipped.

use std::path::{Path, PathBuf};

use field_common::{FieldError, FieldResult};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::{debug, info, warn};

use crate::colormap::Color;

/// Fonts tried when none is configured.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Characters the segment fallback can draw.
const GLYPH_CHARS: &str = "0123456789-+.e";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// A piece of text anchored at a pixel position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Color,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            color: Color::BLACK,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
        }
    }

    pub fn aligned(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    /// Top-left corner for a box of the given size.
    fn origin(&self, width: f32, height: f32) -> (f32, f32) {
        let x = match self.h_align {
            HAlign::Left => self.x,
            HAlign::Center => self.x - width / 2.0,
            HAlign::Right => self.x - width,
        };
        let y = match self.v_align {
            VAlign::Top => self.y,
            VAlign::Middle => self.y - height / 2.0,
            VAlign::Bottom => self.y - height,
        };
        (x, y)
    }
}

/// Draws labels with a font when one is available.
pub struct TextPainter {
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for TextPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPainter")
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl TextPainter {
    /// A painter without a font (segment glyphs only).
    pub fn none() -> Self {
        Self { font: None }
    }

    /// Load a TrueType font.
    pub fn from_file(path: impl AsRef<Path>) -> FieldResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            FieldError::Config(format!("cannot read font {}: {}", path.display(), e))
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| {
            FieldError::Config(format!("{} is not a usable TrueType font", path.display()))
        })?;
        Ok(Self { font: Some(font) })
    }

    /// Use the configured font if given, otherwise the first of
    /// [`DEFAULT_FONT_PATHS`] that loads.
    pub fn discover(configured: Option<&Path>) -> Self {
        if let Some(path) = configured {
            match Self::from_file(path) {
                Ok(painter) => {
                    info!(font = %path.display(), "Loaded font");
                    return painter;
                }
                Err(e) => warn!(error = %e, "Configured font unusable; trying defaults"),
            }
        }

        for candidate in DEFAULT_FONT_PATHS.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            if let Ok(painter) = Self::from_file(&candidate) {
                debug!(font = %candidate.display(), "Using system font");
                return painter;
            }
        }

        warn!("No TrueType font found; titles will be skipped and tick labels drawn with plain glyphs");
        Self::none()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Whether `text` can be drawn at all.
    pub fn can_draw(&self, text: &str) -> bool {
        self.font.is_some() || text.chars().all(|c| GLYPH_CHARS.contains(c))
    }

    /// Approximate rendered size in pixels.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        match &self.font {
            Some(font) => {
                let (w, h) = text_size(Scale::uniform(size), font, text);
                (w as f32, h as f32)
            }
            None => {
                let (char_w, spacing) = glyph_metrics(size);
                let n = text.chars().count() as f32;
                ((n * (char_w + spacing) - spacing).max(0.0), size)
            }
        }
    }

    /// Draw segment glyphs for labels on the pixmap when no font is loaded.
    ///
    /// Returns the labels that could not be drawn this way.
    pub fn draw_fallback<'a>(&self, pixmap: &mut Pixmap, labels: &'a [TextLabel]) -> Vec<&'a TextLabel> {
        if self.font.is_some() {
            return Vec::new();
        }

        let mut skipped = Vec::new();
        for label in labels {
            if !self.can_draw(&label.text) {
                skipped.push(label);
                continue;
            }
            let (w, h) = self.measure(&label.text, label.size);
            let (x, y) = label.origin(w, h);
            draw_glyphs(pixmap, x, y, &label.text, label.size, label.color);
        }
        skipped
    }

    /// Rasterize labels onto the final image with the loaded font.
    pub fn draw_with_font(&self, image: &mut RgbaImage, labels: &[TextLabel]) {
        let Some(font) = &self.font else {
            return;
        };
        for label in labels {
            let (w, h) = self.measure(&label.text, label.size);
            let (x, y) = label.origin(w, h);
            let c = label.color;
            draw_text_mut(
                image,
                Rgba([c.r, c.g, c.b, c.a]),
                x.round() as i32,
                y.round() as i32,
                Scale::uniform(label.size),
                font,
                &label.text,
            );
        }
    }
}

fn glyph_metrics(size: f32) -> (f32, f32) {
    (size * 0.55, size * 0.15)
}

/// Stroke `text` as segment glyphs with its top-left corner at `(x, y)`.
fn draw_glyphs(pixmap: &mut Pixmap, x: f32, y: f32, text: &str, size: f32, color: Color) {
    let (char_w, spacing) = glyph_metrics(size);
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;

    let stroke = Stroke {
        width: (size * 0.1).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let mut pb = PathBuilder::new();
    for (i, ch) in text.chars().enumerate() {
        let cx = x + i as f32 * (char_w + spacing) + char_w / 2.0;
        let cy = y + size / 2.0;
        // Glyphs are drawn a bit smaller than the cell.
        let half_w = char_w * 0.4;
        let half_h = size * 0.4;
        for ((x1, y1), (x2, y2)) in glyph_segments(ch, half_w, half_h) {
            pb.move_to(cx + x1, cy + y1);
            pb.line_to(cx + x2, cy + y2);
        }
    }

    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

type Segment = ((f32, f32), (f32, f32));

/// Seven-segment style strokes centered on the origin (y down).
fn glyph_segments(ch: char, w: f32, h: f32) -> Vec<Segment> {
    let top = ((-w, -h), (w, -h));
    let middle = ((-w, 0.0), (w, 0.0));
    let bottom = ((-w, h), (w, h));
    let upper_left = ((-w, -h), (-w, 0.0));
    let upper_right = ((w, -h), (w, 0.0));
    let lower_left = ((-w, 0.0), (-w, h));
    let lower_right = ((w, 0.0), (w, h));

    match ch {
        '0' => vec![top, bottom, upper_left, lower_left, upper_right, lower_right],
        '1' => vec![upper_right, lower_right],
        '2' => vec![top, upper_right, middle, lower_left, bottom],
        '3' => vec![top, upper_right, middle, lower_right, bottom],
        '4' => vec![upper_left, middle, upper_right, lower_right],
        '5' => vec![top, upper_left, middle, lower_right, bottom],
        '6' => vec![top, upper_left, lower_left, bottom, lower_right, middle],
        '7' => vec![top, ((w, -h), (0.0, h))],
        '8' => vec![top, middle, bottom, upper_left, lower_left, upper_right, lower_right],
        '9' => vec![middle, upper_left, top, upper_right, lower_right, bottom],
        '-' => vec![middle],
        '+' => vec![middle, ((0.0, -h * 0.6), (0.0, h * 0.6))],
        '.' => vec![((0.0, h * 0.8), (0.0, h))],
        'e' => vec![
            ((-w, h * 0.3), (w, h * 0.3)),
            ((w, h * 0.3), (w, -h * 0.1)),
            ((w, -h * 0.1), (-w, -h * 0.1)),
            ((-w, -h * 0.1), (-w, h)),
            ((-w, h), (w, h)),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_only_draws_numbers() {
        let painter = TextPainter::none();
        assert!(painter.can_draw("-1.5e3"));
        assert!(!painter.can_draw("Velocity"));
    }

    #[test]
    fn test_label_alignment() {
        let label = TextLabel::new("10", 100.0, 50.0, 12.0).aligned(HAlign::Right, VAlign::Middle);
        assert_eq!(label.origin(20.0, 12.0), (80.0, 44.0));
    }

    #[test]
    fn test_fallback_draws_pixels() {
        let mut pixmap = Pixmap::new(60, 20).unwrap();
        let labels = vec![
            TextLabel::new("42", 2.0, 2.0, 14.0),
            TextLabel::new("title", 2.0, 2.0, 14.0),
        ];
        let skipped = TextPainter::none().draw_fallback(&mut pixmap, &labels);
        assert_eq!(skipped.len(), 1);
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }
}
