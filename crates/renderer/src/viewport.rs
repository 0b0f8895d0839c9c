//! Mapping from model coordinates to pixels.
//!
//! Both axes share one scale so the physical proportions of the domain are
//! preserved. The data box is centered in the panel; y grows upward in the
//! model and downward in pixels.

use field_common::BoundingBox;

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Equal-aspect transform from a data box into a pixel panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    bounds: BoundingBox,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    panel: PixelRect,
}

impl Viewport {
    /// Fit `bounds` inside `panel`, keeping one scale for both axes.
    ///
    /// Degenerate bounds are padded so the scale stays finite.
    pub fn fit(bounds: BoundingBox, panel: PixelRect) -> Self {
        let bounds = if bounds.width() > 0.0 && bounds.height() > 0.0 {
            bounds
        } else {
            bounds.padded(0.5)
        };

        let scale_x = panel.width as f64 / bounds.width();
        let scale_y = panel.height as f64 / bounds.height();
        let scale = scale_x.min(scale_y);

        let used_w = bounds.width() * scale;
        let used_h = bounds.height() * scale;
        let offset_x = panel.x as f64 + (panel.width as f64 - used_w) / 2.0;
        let offset_y = panel.y as f64 + (panel.height as f64 - used_h) / 2.0;

        Self {
            bounds,
            scale,
            offset_x,
            offset_y,
            panel,
        }
    }

    /// Pixel position of a model coordinate.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let px = self.offset_x + (x - self.bounds.min_x) * self.scale;
        let py = self.offset_y + (self.bounds.max_y - y) * self.scale;
        (px as f32, py as f32)
    }

    /// Pixels per model unit, identical on both axes.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn panel(&self) -> PixelRect {
        self.panel
    }

    /// The pixel rectangle covered by the data bounds (the axes box).
    pub fn data_rect(&self) -> PixelRect {
        PixelRect::new(
            self.offset_x as f32,
            self.offset_y as f32,
            (self.bounds.width() * self.scale) as f32,
            (self.bounds.height() * self.scale) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_aspect_wide_domain() {
        let bounds = BoundingBox::new(0.0, 0.0, 4000.0, 1000.0);
        let vp = Viewport::fit(bounds, PixelRect::new(0.0, 0.0, 400.0, 400.0));
        assert!((vp.scale() - 0.1).abs() < 1e-12);

        let rect = vp.data_rect();
        assert!((rect.width - 400.0).abs() < 1e-3);
        assert!((rect.height - 100.0).abs() < 1e-3);
        // Centered vertically.
        assert!((rect.y - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_y_axis_points_up() {
        let bounds = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let vp = Viewport::fit(bounds, PixelRect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(vp.to_pixel(0.0, 10.0), (0.0, 0.0));
        assert_eq!(vp.to_pixel(10.0, 0.0), (100.0, 100.0));
    }
}
