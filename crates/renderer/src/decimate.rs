//! Index decimation of scattered samples.
//!
//! Keeps every `stride`-th point starting at index 0. No averaging or
//! interpolation is done, so extrema that fall between kept indices are lost.

use field_common::{FieldError, FieldResult, SampledField};

/// Keep every `stride`-th element of three parallel arrays.
///
/// Returns `ceil(n / stride)` elements. A stride of 1 returns copies of the
/// inputs; a stride of zero or less is rejected.
pub fn decimate(
    x: &[f32],
    y: &[f32],
    v: &[f32],
    stride: i64,
) -> FieldResult<(Vec<f32>, Vec<f32>, Vec<f32>)> {
    if stride <= 0 {
        return Err(FieldError::invalid(
            "decimate",
            format!("stride must be a positive integer, got {}", stride),
        ));
    }
    if x.len() != y.len() || x.len() != v.len() {
        return Err(FieldError::invalid(
            "decimate",
            format!("array lengths differ: x={}, y={}, v={}", x.len(), y.len(), v.len()),
        ));
    }

    let step = stride as usize;
    let pick = |data: &[f32]| data.iter().step_by(step).copied().collect::<Vec<f32>>();
    Ok((pick(x), pick(y), pick(v)))
}

/// Decimated copy of a field.
pub fn decimate_field(field: &SampledField, stride: i64) -> FieldResult<SampledField> {
    let (x, y, v) = decimate(field.x(), field.y(), field.values(), stride)?;
    SampledField::new(x, y, v)
}
