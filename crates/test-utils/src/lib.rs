//! Shared test utilities for the gll-plot workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic spectral-element (GLL) point clouds and scalar fields
//! - Record-file and overlay-file fixtures in temporary directories
//! - Approximate-equality assertions
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two color limits (or any `(low, high)` pair).
///
/// ```ignore
/// assert_limits_approx_eq!(limits, (-2.5, 2.5), 1e-6);
/// ```
#[macro_export]
macro_rules! assert_limits_approx_eq {
    ($limits:expr, ($low:expr, $high:expr), $epsilon:expr) => {{
        let limits = $limits;
        $crate::assert_approx_eq!(limits.low, $low, $epsilon);
        $crate::assert_approx_eq!(limits.high, $high, $epsilon);
    }};
}
