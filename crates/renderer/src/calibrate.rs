//! Color limit calibration.
//!
//! Limits are derived in a fixed order:
//! 1. data min/max (NaN ignored)
//! 2. explicit override, when both bounds are given
//! 3. symmetric about zero
//! 4. saturation about the mean: `new = (old - mean) / s + mean`
//!
//! Swapping steps 3 and 4 changes the result, so the order is part of the
//! contract.

use field_common::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

/// Value range mapped onto the full colormap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorLimits {
    pub low: f32,
    pub high: f32,
}

impl ColorLimits {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn mean(&self) -> f32 {
        (self.low + self.high) / 2.0
    }

    pub fn span(&self) -> f32 {
        self.high - self.low
    }

    /// Map a value onto `[0, 1]`, clipping outside the limits.
    ///
    /// A zero-width range maps everything to the middle of the palette.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if !(span > 0.0) {
            return 0.5;
        }
        ((value - self.low) / span).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for ColorLimits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// User-facing calibration knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOptions {
    pub explicit_min: Option<f32>,
    pub explicit_max: Option<f32>,
    #[serde(default)]
    pub symmetric: bool,
    pub saturation: Option<f32>,
}

impl CalibrationOptions {
    /// Check every argument that can be checked without data.
    pub fn validate(&self) -> FieldResult<()> {
        match (self.explicit_min, self.explicit_max) {
            (Some(min), Some(max)) => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(FieldError::invalid(
                        "cmin/cmax",
                        format!("bounds must be finite, got ({}, {})", min, max),
                    ));
                }
                if min >= max {
                    return Err(FieldError::invalid(
                        "cmin/cmax",
                        format!("cmin ({}) must be strictly less than cmax ({})", min, max),
                    ));
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(FieldError::invalid(
                    "cmin/cmax",
                    "explicit color limits need both cmin and cmax",
                ));
            }
            (None, None) => {}
        }

        if let Some(s) = self.saturation {
            if s == 0.0 {
                return Err(FieldError::invalid("saturation", "saturation factor cannot be zero"));
            }
            if !s.is_finite() || s < 0.0 {
                return Err(FieldError::invalid(
                    "saturation",
                    format!("saturation factor must be positive, got {}", s),
                ));
            }
        }

        Ok(())
    }
}

/// Compute display limits for `values`.
pub fn calibrate(
    values: &[f32],
    explicit_min: Option<f32>,
    explicit_max: Option<f32>,
    symmetric: bool,
    saturation: Option<f32>,
) -> FieldResult<ColorLimits> {
    calibrate_with(
        values,
        &CalibrationOptions {
            explicit_min,
            explicit_max,
            symmetric,
            saturation,
        },
    )
}

/// Compute display limits for `values` from a set of options.
pub fn calibrate_with(values: &[f32], options: &CalibrationOptions) -> FieldResult<ColorLimits> {
    options.validate()?;

    let mut limits = match (options.explicit_min, options.explicit_max) {
        (Some(low), Some(high)) => ColorLimits::new(low, high),
        _ => {
            let (low, high) = value_range(values).ok_or_else(|| {
                FieldError::invalid("values", "no finite values to derive color limits from")
            })?;
            ColorLimits::new(low, high)
        }
    };

    if options.symmetric {
        let m = limits.low.abs().max(limits.high.abs());
        limits = ColorLimits::new(-m, m);
    }

    if let Some(s) = options.saturation {
        // s = 1 is the identity; skipping it keeps the limits bit-exact.
        if s != 1.0 {
            let mean = limits.mean();
            limits = ColorLimits::new(
                (limits.low - mean) / s + mean,
                (limits.high - mean) / s + mean,
            );
        }
    }

    Ok(limits)
}

/// Min and max of the finite values, or `None` when there are none.
pub fn value_range(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
