#![cfg(feature = "dev")]
//! Tests for the elementwise transform engine and the math built on it.
//!
//! ## Test Organization
//!
//! 1. **Unary Transforms** - fresh output, unit closure, kind dispatch
//! 2. **Binary Transforms** - broadcasting, unit closure failures
//! 3. **In-Place Transforms** - fixed output kind, containment
//! 4. **Elementwise Math** - reciprocal, abs, sqrt, norm, dot,
//!    replace_nan

use approx::assert_relative_eq;
use labarray::internals::engine::{
    transform_binary, transform_in_place, transform_in_place_binary, transform_unary,
};
use labarray::prelude::*;

fn dims(pairs: &[(Dim, usize)]) -> Dimensions {
    Dimensions::from_pairs(pairs).unwrap()
}

fn meters(pairs: &[(Dim, usize)], values: Vec<f64>) -> Variable {
    Variable::new::<f64>(Unit::m(), dims(pairs), values).unwrap()
}

// ============================================================================
// Unary Transforms
// ============================================================================

/// A unary transform maps elements and runs the unit closure once.
#[test]
fn test_transform_unary() {
    let v = meters(&[(Dim::X, 3)], vec![1.0, 2.0, 3.0]);
    let doubled =
        transform_unary::<f64, f64>(&v, |unit| unit * Unit::m(), |&x| 2.0 * x).unwrap();
    assert_eq!(doubled.values::<f64>().unwrap(), &[2.0, 4.0, 6.0]);
    assert_eq!(doubled.unit(), Unit::m() * Unit::m());
}

/// A transform may change the element kind.
#[test]
fn test_transform_unary_promotes() {
    let v = Variable::new::<i32>(Unit::dimensionless(), dims(&[(Dim::X, 2)]), vec![1, 2])
        .unwrap();
    let wide = transform_unary::<i32, i64>(&v, |unit| unit, |&x| x as i64).unwrap();
    assert_eq!(wide.kind(), ElementKind::Int64);
    assert_eq!(wide.values::<i64>().unwrap(), &[1, 2]);
}

/// Requesting the wrong input kind is a miss in the dispatch.
#[test]
fn test_transform_unary_kind_mismatch() {
    let v = meters(&[(Dim::X, 2)], vec![1.0, 2.0]);
    assert!(matches!(
        transform_unary::<f32, f32>(&v, |unit| unit, |&x| x),
        Err(ArrayError::KindMismatch { .. })
    ));
}

// ============================================================================
// Binary Transforms
// ============================================================================

/// Binary transforms align to the wider shape and broadcast the other
/// operand.
#[test]
fn test_transform_binary_broadcast() {
    let a = meters(
        &[(Dim::Y, 2), (Dim::X, 3)],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    );
    let b = meters(&[(Dim::X, 3)], vec![10.0, 100.0, 1000.0]);
    let out = transform_binary::<f64, f64, f64>(
        &a,
        &b,
        |unit_a, unit_b| Ok(unit_a * unit_b),
        |&x, &y| x * y,
    )
    .unwrap();
    assert_eq!(
        out.values::<f64>().unwrap(),
        &[10.0, 200.0, 3000.0, 40.0, 500.0, 6000.0]
    );
    assert_eq!(out.unit(), Unit::m() * Unit::m());
}

/// The unit closure can reject the combination before any work.
#[test]
fn test_transform_binary_unit_rejection() {
    let a = meters(&[(Dim::X, 2)], vec![1.0, 2.0]);
    let b = Variable::new::<f64>(Unit::s(), dims(&[(Dim::X, 2)]), vec![1.0, 2.0]).unwrap();
    let result = transform_binary::<f64, f64, f64>(
        &a,
        &b,
        |unit_a, unit_b| {
            if unit_a == unit_b {
                Ok(unit_a)
            } else {
                Err(ArrayError::UnitMismatch {
                    expected: unit_a,
                    actual: unit_b,
                })
            }
        },
        |&x, &y| x + y,
    );
    assert!(matches!(result, Err(ArrayError::UnitMismatch { .. })));
}

/// Incompatible shapes are rejected.
#[test]
fn test_transform_binary_shape_rejection() {
    let a = meters(&[(Dim::X, 2)], vec![1.0, 2.0]);
    let b = meters(&[(Dim::Y, 2)], vec![1.0, 2.0]);
    assert!(matches!(
        transform_binary::<f64, f64, f64>(&a, &b, |u, _| Ok(u), |&x, &y| x + y),
        Err(ArrayError::DimensionMismatch { .. })
    ));
}

// ============================================================================
// In-Place Transforms
// ============================================================================

/// In-place transforms mutate the target without reallocation.
#[test]
fn test_transform_in_place() {
    let mut v = meters(&[(Dim::X, 3)], vec![1.0, -2.0, 3.0]);
    transform_in_place::<f64>(&mut v, |x| *x = -*x).unwrap();
    assert_eq!(v.values::<f64>().unwrap(), &[-1.0, 2.0, -3.0]);
}

/// The in-place binary form broadcasts the other operand over the
/// target and updates the unit through the closure.
#[test]
fn test_transform_in_place_binary() {
    let mut v = meters(
        &[(Dim::Y, 2), (Dim::X, 2)],
        vec![1.0, 2.0, 3.0, 4.0],
    );
    let scale = Variable::new::<f64>(Unit::s(), dims(&[(Dim::X, 2)]), vec![10.0, 100.0])
        .unwrap();
    transform_in_place_binary::<f64, f64>(
        &mut v,
        &scale,
        |unit_a, unit_b| Ok(unit_a * unit_b),
        |x, &y| *x *= y,
    )
    .unwrap();
    assert_eq!(v.values::<f64>().unwrap(), &[10.0, 200.0, 30.0, 400.0]);
    assert_eq!(v.unit(), Unit::m() * Unit::s());
}

/// The target must contain the other operand: in-place never grows.
#[test]
fn test_transform_in_place_binary_containment() {
    let mut narrow = meters(&[(Dim::X, 2)], vec![1.0, 2.0]);
    let wide = meters(&[(Dim::Y, 2), (Dim::X, 2)], vec![0.0; 4]);
    assert!(matches!(
        transform_in_place_binary::<f64, f64>(&mut narrow, &wide, |u, _| Ok(u), |x, &y| {
            *x += y
        }),
        Err(ArrayError::DimensionMismatch { .. })
    ));
}

// ============================================================================
// Elementwise Math
// ============================================================================

/// Reciprocal inverts values and units.
#[test]
fn test_reciprocal() {
    let v = meters(&[(Dim::X, 2)], vec![2.0, 4.0]);
    let r = reciprocal(&v).unwrap();
    assert_eq!(r.values::<f64>().unwrap(), &[0.5, 0.25]);
    assert_eq!(r.unit(), Unit::dimensionless() / Unit::m());

    let s = Variable::new::<String>(
        Unit::dimensionless(),
        dims(&[(Dim::X, 1)]),
        vec!["a".to_string()],
    )
    .unwrap();
    assert!(matches!(
        reciprocal(&s),
        Err(ArrayError::KindNotSupported { .. })
    ));
}

/// Absolute value and square root leave the unit unchanged.
#[test]
fn test_abs_sqrt() {
    let v = meters(&[(Dim::X, 3)], vec![-1.0, 4.0, -9.0]);
    let a = abs(&v).unwrap();
    assert_eq!(a.values::<f64>().unwrap(), &[1.0, 4.0, 9.0]);
    assert_eq!(a.unit(), Unit::m());

    let r = sqrt(&a).unwrap();
    assert_eq!(r.values::<f64>().unwrap(), &[1.0, 2.0, 3.0]);
}

/// Norm reduces 3-vectors to their length; dot multiplies pairwise.
#[test]
fn test_norm_and_dot() {
    let v = Variable::new::<[f64; 3]>(
        Unit::m(),
        dims(&[(Dim::X, 2)]),
        vec![[3.0, 4.0, 0.0], [1.0, 2.0, 2.0]],
    )
    .unwrap();
    let n = norm(&v).unwrap();
    assert_eq!(n.kind(), ElementKind::Double);
    assert_eq!(n.values::<f64>().unwrap(), &[5.0, 3.0]);
    assert_eq!(n.unit(), Unit::m());

    let w = Variable::new::<[f64; 3]>(
        Unit::m(),
        dims(&[(Dim::X, 2)]),
        vec![[4.0, 5.0, 6.0], [1.0, 0.0, 0.0]],
    )
    .unwrap();
    let d = dot(&v, &w).unwrap();
    assert_eq!(d.values::<f64>().unwrap(), &[32.0, 1.0]);
    assert_eq!(d.unit(), Unit::m() * Unit::m());
}

/// NaN values are replaced; the replacement type must match the kind.
#[test]
fn test_replace_nan() {
    let v = meters(&[(Dim::X, 3)], vec![1.0, f64::NAN, 3.0]);
    let r = replace_nan(&v, 9.0f64).unwrap();
    assert_relative_eq!(r.values::<f64>().unwrap()[1], 9.0);
    assert_relative_eq!(r.values::<f64>().unwrap()[0], 1.0);
    assert_eq!(r.unit(), Unit::m());

    assert!(matches!(
        replace_nan(&v, 9.0f32),
        Err(ArrayError::KindMismatch { .. })
    ));
}
