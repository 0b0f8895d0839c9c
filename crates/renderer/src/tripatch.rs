//! Flat-shaded triangles: one color per triangle from the mean of its
//! vertex values.

use std::collections::HashMap;

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::calibrate::ColorLimits;
use crate::colormap::{Color, Colormap};
use crate::triangulation::Triangulation;
use crate::viewport::Viewport;

/// Mean of a triangle's vertex values, `None` when any of them is NaN.
pub fn face_value(values: &[f32], tri: &[usize; 3]) -> Option<f32> {
    let [a, b, c] = tri.map(|i| values[i]);
    if a.is_nan() || b.is_nan() || c.is_nan() {
        return None;
    }
    Some((a + b + c) / 3.0)
}

/// Draw one flat-colored patch per triangle. Returns the number drawn.
#[allow(clippy::too_many_arguments)]
pub fn fill_patches(
    pixmap: &mut Pixmap,
    viewport: &Viewport,
    x: &[f32],
    y: &[f32],
    values: &[f32],
    triangulation: &Triangulation,
    limits: &ColorLimits,
    colormap: &Colormap,
) -> usize {
    // Batch triangles by color so each color is a single fill.
    let mut batches: HashMap<Color, PathBuilder> = HashMap::new();
    let mut drawn = 0;

    for tri in triangulation.triangles() {
        let Some(value) = face_value(values, tri) else {
            continue;
        };
        let color = colormap.map(value, limits);

        let pb = batches.entry(color).or_default();
        let [p0, p1, p2] = tri.map(|i| viewport.to_pixel(x[i] as f64, y[i] as f64));
        pb.move_to(p0.0, p0.1);
        pb.line_to(p1.0, p1.1);
        pb.line_to(p2.0, p2.1);
        pb.close();
        drawn += 1;
    }

    for (color, pb) in batches {
        let Some(path) = pb.finish() else {
            continue;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = false;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_value_is_mean() {
        let values = [1.0, 2.0, 6.0, f32::NAN];
        assert_eq!(face_value(&values, &[0, 1, 2]), Some(3.0));
        assert_eq!(face_value(&values, &[0, 1, 3]), None);
    }
}
