//! Tests for index decimation.

use field_common::FieldError;
use renderer::decimate::{decimate, decimate_field};
use test_utils::{gll_mesh, random_field};

#[test]
fn test_stride_one_returns_input() {
    let field = random_field(37, 1);
    let out = decimate_field(&field, 1).unwrap();
    assert_eq!(out, field);
}

#[test]
fn test_length_is_ceil_n_over_k() {
    let field = random_field(101, 2);
    for k in 1..=12i64 {
        let out = decimate_field(&field, k).unwrap();
        let expected = (101 + k as usize - 1) / k as usize;
        assert_eq!(out.len(), expected, "stride {}", k);
    }
}

#[test]
fn test_keeps_every_kth_from_zero() {
    let x: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let y: Vec<f32> = x.iter().map(|v| v * 10.0).collect();
    let v: Vec<f32> = x.iter().map(|v| v * 100.0).collect();

    let (dx, dy, dv) = decimate(&x, &y, &v, 4).unwrap();
    assert_eq!(dx, vec![0.0, 4.0, 8.0]);
    assert_eq!(dy, vec![0.0, 40.0, 80.0]);
    assert_eq!(dv, vec![0.0, 400.0, 800.0]);
}

#[test]
fn test_stride_larger_than_input() {
    let (x, z) = gll_mesh(1, 1, 3, 1.0, 1.0);
    let (dx, dz, _) = decimate(&x, &z, &x, 1000).unwrap();
    assert_eq!(dx, vec![x[0]]);
    assert_eq!(dz, vec![z[0]]);
}

#[test]
fn test_empty_input() {
    let (dx, dy, dv) = decimate(&[], &[], &[], 3).unwrap();
    assert!(dx.is_empty() && dy.is_empty() && dv.is_empty());
}

#[test]
fn test_zero_and_negative_stride_rejected() {
    let x = [1.0, 2.0, 3.0];
    for stride in [0, -1, -50] {
        let err = decimate(&x, &x, &x, stride).unwrap_err();
        assert!(
            matches!(err, FieldError::InvalidArgument { .. }),
            "stride {} gave {:?}",
            stride,
            err
        );
    }
}

#[test]
fn test_mismatched_lengths_rejected() {
    let err = decimate(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1).unwrap_err();
    assert!(matches!(err, FieldError::InvalidArgument { .. }));
}
