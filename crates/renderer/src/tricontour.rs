//! Filled contours over a triangle mesh.
//!
//! Each triangle is clipped against every band `[levels[k], levels[k + 1]]`
//! it overlaps; values are linear inside a triangle so the clipped pieces
//! are convex polygons. Vertex values are clamped to the outer levels first,
//! which extends the first and last band to out-of-range data.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::colormap::{Color, Colormap};
use crate::triangulation::Triangulation;
use crate::viewport::Viewport;

/// A mesh vertex in pixel space carrying its field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub x: f32,
    pub y: f32,
    pub value: f32,
}

impl ValuePoint {
    pub fn new(x: f32, y: f32, value: f32) -> Self {
        Self { x, y, value }
    }

    fn lerp(self, other: ValuePoint, level: f32) -> ValuePoint {
        let dv = other.value - self.value;
        let t = if dv == 0.0 { 0.0 } else { (level - self.value) / dv };
        ValuePoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            value: level,
        }
    }
}

/// Keep the part of a convex polygon on one side of `level`.
fn clip(polygon: &[ValuePoint], level: f32, keep_above: bool) -> Vec<ValuePoint> {
    let inside = |p: &ValuePoint| {
        if keep_above {
            p.value >= level
        } else {
            p.value <= level
        }
    };

    let mut out = Vec::with_capacity(polygon.len() + 2);
    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let current_in = inside(current);
        if current_in {
            out.push(*current);
        }
        if current_in != inside(next) {
            out.push(current.lerp(*next, level));
        }
    }
    out
}

/// Split one triangle into per-band polygons.
///
/// Returns `(band index, polygon)` pairs; bands the triangle does not reach
/// are skipped.
pub fn band_polygons(triangle: [ValuePoint; 3], levels: &[f32]) -> Vec<(usize, Vec<ValuePoint>)> {
    if levels.len() < 2 {
        return Vec::new();
    }
    let low = levels[0];
    let high = levels[levels.len() - 1];

    let clamped = triangle.map(|p| ValuePoint {
        value: p.value.clamp(low, high),
        ..p
    });
    let vmin = clamped.iter().map(|p| p.value).fold(f32::INFINITY, f32::min);
    let vmax = clamped.iter().map(|p| p.value).fold(f32::NEG_INFINITY, f32::max);

    if vmin == vmax {
        return vec![(band_index(vmin, levels), clamped.to_vec())];
    }

    let mut pieces = Vec::new();
    for (band, pair) in levels.windows(2).enumerate() {
        let (lo, hi) = (pair[0], pair[1]);
        if hi <= vmin || lo >= vmax {
            continue;
        }

        let polygon = if lo <= vmin && vmax <= hi {
            clamped.to_vec()
        } else {
            let above = clip(&clamped, lo, true);
            if above.len() < 3 {
                continue;
            }
            clip(&above, hi, false)
        };

        if polygon.len() >= 3 {
            pieces.push((band, polygon));
        }
    }
    pieces
}

/// Band holding `value`; bands are closed below, the last one on both ends.
pub fn band_index(value: f32, levels: &[f32]) -> usize {
    let last = levels.len().saturating_sub(2);
    levels
        .windows(2)
        .position(|pair| value < pair[1])
        .unwrap_or(last)
        .min(last)
}

/// Fill color of band `k` out of `bands`.
pub fn band_color(colormap: &Colormap, band: usize, bands: usize) -> Color {
    colormap.at((band as f32 + 0.5) / bands.max(1) as f32)
}

/// Draw filled bands for every triangle onto `pixmap`.
///
/// Triangles with a NaN vertex value are left blank. Returns the number of
/// triangles drawn.
#[allow(clippy::too_many_arguments)]
pub fn fill_bands(
    pixmap: &mut Pixmap,
    viewport: &Viewport,
    x: &[f32],
    y: &[f32],
    values: &[f32],
    triangulation: &Triangulation,
    levels: &[f32],
    colormap: &Colormap,
) -> usize {
    let bands = levels.len().saturating_sub(1);
    let mut builders: Vec<PathBuilder> = (0..bands).map(|_| PathBuilder::new()).collect();
    let mut drawn = 0;

    for tri in triangulation.triangles() {
        let corners = tri.map(|i| {
            let (px, py) = viewport.to_pixel(x[i] as f64, y[i] as f64);
            ValuePoint::new(px, py, values[i])
        });
        if corners.iter().any(|p| p.value.is_nan()) {
            continue;
        }
        drawn += 1;

        for (band, polygon) in band_polygons(corners, levels) {
            let pb = &mut builders[band];
            pb.move_to(polygon[0].x, polygon[0].y);
            for p in &polygon[1..] {
                pb.line_to(p.x, p.y);
            }
            pb.close();
        }
    }

    for (band, pb) in builders.into_iter().enumerate() {
        let Some(path) = pb.finish() else {
            continue;
        };
        let mut paint = Paint::default();
        paint.set_color(band_color(colormap, band, bands).to_skia());
        // Adjacent pieces share edges exactly; anti-aliasing would show seams.
        paint.anti_alias = false;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(polygon: &[ValuePoint]) -> f32 {
        let mut sum = 0.0;
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum.abs() / 2.0
    }

    fn triangle() -> [ValuePoint; 3] {
        [
            ValuePoint::new(0.0, 0.0, 0.0),
            ValuePoint::new(10.0, 0.0, 10.0),
            ValuePoint::new(0.0, 10.0, 0.0),
        ]
    }

    #[test]
    fn test_bands_partition_triangle() {
        let levels = [0.0, 2.5, 5.0, 7.5, 10.0];
        let pieces = band_polygons(triangle(), &levels);
        assert_eq!(pieces.len(), 4);

        let total: f32 = pieces.iter().map(|(_, p)| area(p)).sum();
        assert!((total - 50.0).abs() < 1e-3, "total area {}", total);
    }

    #[test]
    fn test_out_of_range_values_extend_outer_bands() {
        let tri = [
            ValuePoint::new(0.0, 0.0, -100.0),
            ValuePoint::new(10.0, 0.0, -50.0),
            ValuePoint::new(0.0, 10.0, -75.0),
        ];
        let pieces = band_polygons(tri, &[0.0, 1.0, 2.0]);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].0, 0);
        assert!((area(&pieces[0].1) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_flat_triangle_on_level_gets_upper_band() {
        let tri = [
            ValuePoint::new(0.0, 0.0, 2.5),
            ValuePoint::new(10.0, 0.0, 2.5),
            ValuePoint::new(0.0, 10.0, 2.5),
        ];
        let pieces = band_polygons(tri, &[0.0, 2.5, 5.0]);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].0, 1);
        assert_eq!(band_index(5.0, &[0.0, 2.5, 5.0]), 1);
    }

    #[test]
    fn test_band_color_is_band_center() {
        let map = Colormap::by_name("gray").unwrap();
        assert_eq!(band_color(&map, 0, 1), map.at(0.5));
        assert_eq!(band_color(&map, 3, 4), map.at(0.875));
    }
}
