//! Bounding box of a planar point cloud.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in model coordinates (usually meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every finite `(x, y)` pair.
    ///
    /// Returns `None` when no pair is finite.
    pub fn from_points(x: &[f32], y: &[f32]) -> Option<Self> {
        let mut bbox: Option<BoundingBox> = None;
        for (&px, &py) in x.iter().zip(y) {
            if !px.is_finite() || !py.is_finite() {
                continue;
            }
            let (px, py) = (px as f64, py as f64);
            bbox = Some(match bbox {
                None => BoundingBox::new(px, py, px, py),
                Some(b) => BoundingBox::new(
                    b.min_x.min(px),
                    b.min_y.min(py),
                    b.max_x.max(px),
                    b.max_y.max(py),
                ),
            });
        }
        bbox
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check whether a point lies inside (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Grow the box by `fraction` of its size on every side.
    ///
    /// A zero-size axis is grown by `fraction` of the other axis (or by 1.0
    /// when both are zero) so the result always has positive area.
    pub fn padded(&self, fraction: f64) -> BoundingBox {
        let span = self.width().max(self.height());
        let span = if span > 0.0 { span } else { 1.0 };
        let pad_x = if self.width() > 0.0 { self.width() } else { span } * fraction;
        let pad_y = if self.height() > 0.0 { self.height() } else { span } * fraction;
        BoundingBox {
            min_x: self.min_x - pad_x,
            min_y: self.min_y - pad_y,
            max_x: self.max_x + pad_x,
            max_y: self.max_y + pad_y,
        }
    }

    /// Aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}] x [{}, {}]", self.min_x, self.max_x, self.min_y, self.max_y)
    }
}
