//! Scalar field sampled at unstructured points.

use crate::bbox::BoundingBox;
use crate::error::{FieldError, FieldResult};

/// Values sampled at scattered planar coordinates (e.g. GLL nodes).
///
/// The three sequences always have the same length. Duplicate coordinates
/// are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledField {
    x: Vec<f32>,
    y: Vec<f32>,
    v: Vec<f32>,
}

impl SampledField {
    /// Build a field from parallel coordinate and value arrays.
    pub fn new(x: Vec<f32>, y: Vec<f32>, v: Vec<f32>) -> FieldResult<Self> {
        if x.len() != y.len() || x.len() != v.len() {
            return Err(FieldError::invalid(
                "field",
                format!(
                    "coordinate/value lengths differ: x={}, y={}, v={}",
                    x.len(),
                    y.len(),
                    v.len()
                ),
            ));
        }
        Ok(Self { x, y, v })
    }

    /// Concatenate several fields (e.g. one per processor slice) in order.
    pub fn concat(parts: impl IntoIterator<Item = SampledField>) -> SampledField {
        let mut out = SampledField {
            x: Vec::new(),
            y: Vec::new(),
            v: Vec::new(),
        };
        for part in parts {
            out.x.extend(part.x);
            out.y.extend(part.y);
            out.v.extend(part.v);
        }
        out
    }

    pub fn x(&self) -> &[f32] {
        &self.x
    }

    pub fn y(&self) -> &[f32] {
        &self.y
    }

    pub fn values(&self) -> &[f32] {
        &self.v
    }

    /// Number of sample points.
    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Bounding box of the finite coordinates.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.x, &self.y)
    }

    /// Take the three arrays back out.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        (self.x, self.y, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let err = SampledField::new(vec![0.0, 1.0], vec![0.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FieldError::InvalidArgument { .. }));
    }

    #[test]
    fn test_concat_preserves_order() {
        let a = SampledField::new(vec![0.0], vec![1.0], vec![2.0]).unwrap();
        let b = SampledField::new(vec![3.0, 6.0], vec![4.0, 7.0], vec![5.0, 8.0]).unwrap();
        let joined = SampledField::concat([a, b]);
        assert_eq!(joined.x(), &[0.0, 3.0, 6.0]);
        assert_eq!(joined.y(), &[1.0, 4.0, 7.0]);
        assert_eq!(joined.values(), &[2.0, 5.0, 8.0]);
    }

    #[test]
    fn test_bounds_skip_nan() {
        let field = SampledField::new(
            vec![0.0, f32::NAN, 4.0],
            vec![-1.0, 100.0, 2.0],
            vec![0.0, 0.0, 0.0],
        )
        .unwrap();
        let bbox = field.bounds().unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, -1.0, 4.0, 2.0));
    }
}
