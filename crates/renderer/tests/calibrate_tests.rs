//! Tests for color limit calibration.

use field_common::FieldError;
use renderer::calibrate::{calibrate, calibrate_with, CalibrationOptions, ColorLimits};
use test_utils::{assert_limits_approx_eq, random_field, wavefield_snapshot};

const SCENARIO: [f32; 5] = [-3.0, -1.0, 0.0, 2.0, 5.0];

fn assert_invalid(result: Result<ColorLimits, FieldError>, param: &str) {
    match result {
        Err(FieldError::InvalidArgument { param: p, .. }) => assert_eq!(p, param),
        other => panic!("expected InvalidArgument for {}, got {:?}", param, other),
    }
}

// ============================================================================
// Default limits
// ============================================================================

#[test]
fn test_default_limits_are_data_range() {
    let limits = calibrate(&SCENARIO, None, None, false, None).unwrap();
    assert_eq!(limits, ColorLimits::new(-3.0, 5.0));
}

#[test]
fn test_default_limits_match_min_max_for_random_values() {
    for seed in 0..10 {
        let field = random_field(200, seed);
        let values = field.values();
        let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        let limits = calibrate(values, None, None, false, None).unwrap();
        assert_eq!(limits.low, min);
        assert_eq!(limits.high, max);
    }
}

#[test]
fn test_nan_values_are_ignored() {
    let values = [f32::NAN, 1.0, 4.0, f32::NAN];
    let limits = calibrate(&values, None, None, false, None).unwrap();
    assert_eq!(limits, ColorLimits::new(1.0, 4.0));
}

#[test]
fn test_empty_values_need_explicit_limits() {
    assert_invalid(calibrate(&[], None, None, false, None), "values");
    assert_invalid(calibrate(&[f32::NAN], None, None, false, None), "values");

    let limits = calibrate(&[], Some(0.0), Some(1.0), false, None).unwrap();
    assert_eq!(limits, ColorLimits::new(0.0, 1.0));
}

// ============================================================================
// Explicit override
// ============================================================================

#[test]
fn test_explicit_limits_replace_data_range() {
    let limits = calibrate(&SCENARIO, Some(-10.0), Some(10.0), false, None).unwrap();
    assert_eq!(limits, ColorLimits::new(-10.0, 10.0));
}

#[test]
fn test_inverted_or_equal_limits_rejected() {
    assert_invalid(calibrate(&SCENARIO, Some(5.0), Some(1.0), false, None), "cmin/cmax");
    assert_invalid(calibrate(&SCENARIO, Some(2.0), Some(2.0), false, None), "cmin/cmax");
}

#[test]
fn test_single_explicit_bound_rejected() {
    assert_invalid(calibrate(&SCENARIO, Some(0.0), None, false, None), "cmin/cmax");
    assert_invalid(calibrate(&SCENARIO, None, Some(0.0), false, None), "cmin/cmax");
}

#[test]
fn test_validation_needs_no_data() {
    let options = CalibrationOptions {
        explicit_min: Some(3.0),
        explicit_max: Some(-3.0),
        ..CalibrationOptions::default()
    };
    assert!(options.validate().is_err());
    assert!(CalibrationOptions::default().validate().is_ok());
}

// ============================================================================
// Symmetric and saturation
// ============================================================================

#[test]
fn test_symmetric_scenario() {
    let limits = calibrate(&SCENARIO, None, None, true, None).unwrap();
    assert_eq!(limits, ColorLimits::new(-5.0, 5.0));
}

#[test]
fn test_symmetric_then_saturation_scenario() {
    let limits = calibrate(&SCENARIO, None, None, true, Some(2.0)).unwrap();
    assert_limits_approx_eq!(limits, (-2.5, 2.5), 1e-6);
}

#[test]
fn test_symmetric_property_on_signed_fields() {
    let field = wavefield_snapshot(8, 4, 5);
    let limits = calibrate(field.values(), None, None, true, None).unwrap();
    assert!(limits.low < 0.0);
    assert_eq!(limits.low, -limits.high);
}

#[test]
fn test_symmetric_applies_after_override() {
    let limits = calibrate(&SCENARIO, Some(-1.0), Some(8.0), true, None).unwrap();
    assert_eq!(limits, ColorLimits::new(-8.0, 8.0));
}

#[test]
fn test_saturation_one_is_identity() {
    for symmetric in [false, true] {
        let plain = calibrate(&SCENARIO, None, None, symmetric, None).unwrap();
        let saturated = calibrate(&SCENARIO, None, None, symmetric, Some(1.0)).unwrap();
        assert_eq!(plain, saturated);
    }
}

#[test]
fn test_saturation_below_one_expands() {
    // mean 1, half-range 4 -> 8
    let limits = calibrate(&SCENARIO, None, None, false, Some(0.5)).unwrap();
    assert_limits_approx_eq!(limits, (-7.0, 9.0), 1e-6);
}

#[test]
fn test_order_is_symmetric_then_saturation() {
    // Saturation first would give (-1, 3) -> symmetric (-3, 3).
    let limits = calibrate(&SCENARIO, None, None, true, Some(2.0)).unwrap();
    assert_ne!(limits, ColorLimits::new(-3.0, 3.0));
}

#[test]
fn test_invalid_saturation_rejected() {
    assert_invalid(calibrate(&SCENARIO, None, None, false, Some(0.0)), "saturation");
    assert_invalid(calibrate(&SCENARIO, None, None, false, Some(-2.0)), "saturation");
    assert_invalid(calibrate(&SCENARIO, None, None, false, Some(f32::NAN)), "saturation");
}

#[test]
fn test_calibrate_with_matches_calibrate() {
    let options = CalibrationOptions {
        explicit_min: None,
        explicit_max: None,
        symmetric: true,
        saturation: Some(2.0),
    };
    assert_eq!(
        calibrate_with(&SCENARIO, &options).unwrap(),
        calibrate(&SCENARIO, None, None, true, Some(2.0)).unwrap()
    );
}
