#![cfg(feature = "dev")]
//! Tests for histogram rebinning.
//!
//! ## Test Organization
//!
//! 1. **1-D Sweeps** - identity, merging, partial overlap
//! 2. **Conservation** - totals preserved under covering edges
//! 3. **Multi-Dimensional** - the parallel innermost path and the strided
//!    general path
//! 4. **Rejections** - kinds, coordinate shapes, edge ordering

use approx::assert_relative_eq;
use labarray::prelude::*;

fn dims(pairs: &[(Dim, usize)]) -> Dimensions {
    Dimensions::from_pairs(pairs).unwrap()
}

fn counts(pairs: &[(Dim, usize)], values: Vec<f64>) -> Variable {
    Variable::new::<f64>(Unit::counts(), dims(pairs), values).unwrap()
}

fn edges(dim: Dim, values: Vec<f64>) -> Variable {
    Variable::new::<f64>(Unit::counts(), dims(&[(dim, values.len())]), values).unwrap()
}

fn assert_values_eq(var: &Variable, expected: &[f64]) {
    let got = var.values::<f64>().unwrap();
    assert_eq!(got.len(), expected.len());
    for (&g, &e) in got.iter().zip(expected) {
        assert_relative_eq!(g, e, epsilon = 1e-12);
    }
}

// ============================================================================
// 1-D Sweeps
// ============================================================================

/// Rebinning onto the input's own edges is the identity.
#[test]
fn test_rebin_identity() {
    let data = counts(&[(Dim::X, 3)], vec![10.0, 20.0, 30.0]);
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0]);
    let new = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();
    assert_values_eq(&out, &[10.0, 20.0, 30.0]);
    assert_eq!(out.unit(), Unit::counts());
}

/// Merging adjacent bins sums them.
#[test]
fn test_rebin_merge() {
    let data = counts(&[(Dim::X, 4)], vec![1.0, 1.0, 1.0, 1.0]);
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    let new = edges(Dim::X, vec![0.0, 2.0, 4.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();
    assert_eq!(out.dims(), &dims(&[(Dim::X, 2)]));
    assert_values_eq(&out, &[2.0, 2.0]);
}

/// Splitting a bin distributes its content by overlap fraction.
#[test]
fn test_rebin_partial_overlap() {
    let data = counts(&[(Dim::X, 1)], vec![10.0]);
    let old = edges(Dim::X, vec![0.0, 2.0]);
    let new = edges(Dim::X, vec![0.0, 1.0, 2.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();
    assert_values_eq(&out, &[5.0, 5.0]);
}

/// Output bins outside the input range stay zero.
#[test]
fn test_rebin_disjoint_ranges() {
    let data = counts(&[(Dim::X, 2)], vec![3.0, 7.0]);
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0]);
    let new = edges(Dim::X, vec![5.0, 6.0, 7.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();
    assert_values_eq(&out, &[0.0, 0.0]);
}

// ============================================================================
// Conservation
// ============================================================================

/// Any output edge set covering the input range preserves the total.
#[test]
fn test_rebin_conservation() {
    let data = counts(&[(Dim::X, 5)], vec![3.5, 1.25, 0.5, 4.0, 2.75]);
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    let new = edges(Dim::X, vec![-1.0, 0.7, 1.3, 2.2, 4.9, 6.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();

    let total_in = sum(&data, Dim::X).unwrap();
    let total_out = sum(&out, Dim::X).unwrap();
    assert_relative_eq!(
        total_in.values::<f64>().unwrap()[0],
        total_out.values::<f64>().unwrap()[0],
        epsilon = 1e-12
    );
}

// ============================================================================
// Multi-Dimensional
// ============================================================================

/// Rebinning the innermost axis sweeps each outer row independently.
#[test]
fn test_rebin_inner_rows() {
    let data = counts(
        &[(Dim::Y, 2), (Dim::X, 3)],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    );
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0]);
    let new = edges(Dim::X, vec![0.0, 1.5, 3.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();
    assert_eq!(out.dims(), &dims(&[(Dim::Y, 2), (Dim::X, 2)]));
    assert_values_eq(&out, &[2.0, 4.0, 6.5, 8.5]);
}

/// Rebinning a non-innermost axis takes the strided path with the same
/// arithmetic.
#[test]
fn test_rebin_outer_axis() {
    let data = counts(
        &[(Dim::X, 3), (Dim::Y, 2)],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    );
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0]);
    let new = edges(Dim::X, vec![0.0, 3.0]);
    let out = rebin(&data, Dim::X, &old, &new).unwrap();
    assert_eq!(out.dims(), &dims(&[(Dim::X, 1), (Dim::Y, 2)]));
    assert_values_eq(&out, &[9.0, 12.0]);
}

/// The strided and innermost paths agree on transposed data.
#[test]
fn test_rebin_paths_agree() {
    let inner = counts(
        &[(Dim::Y, 2), (Dim::X, 3)],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    );
    let outer = inner.transpose(&[Dim::X, Dim::Y]).unwrap().to_owned();
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0, 3.0]);
    let new = edges(Dim::X, vec![0.0, 1.5, 3.0]);

    let from_inner = rebin(&inner, Dim::X, &old, &new).unwrap();
    let from_outer = rebin(&outer, Dim::X, &old, &new).unwrap();
    // Equal up to the dimension permutation.
    assert_eq!(from_inner, from_outer);
}

// ============================================================================
// Rejections
// ============================================================================

/// Only float kinds can be rebinned.
#[test]
fn test_rebin_kind_rejections() {
    let ints =
        Variable::new::<i64>(Unit::counts(), dims(&[(Dim::X, 2)]), vec![1, 2]).unwrap();
    let old = edges(Dim::X, vec![0.0, 1.0, 2.0]);
    assert!(matches!(
        rebin(&ints, Dim::X, &old, &old),
        Err(ArrayError::KindNotSupported { .. })
    ));

    let mut sparse = dims(&[(Dim::Y, 1)]);
    sparse.add_sparse(Dim::X).unwrap();
    let events =
        Variable::new::<Vec<f64>>(Unit::counts(), sparse, vec![vec![1.0]]).unwrap();
    assert!(matches!(
        rebin(&events, Dim::X, &old, &old),
        Err(ArrayError::UnexpectedSparseDimension { .. })
    ));
}

/// Coordinates must be 1-D over the rebinned axis, one edge longer than
/// the data, and strictly increasing.
#[test]
fn test_rebin_coordinate_rejections() {
    let data = counts(&[(Dim::X, 2)], vec![1.0, 2.0]);
    let good = edges(Dim::X, vec![0.0, 1.0, 2.0]);

    let wrong_label = edges(Dim::Y, vec![0.0, 1.0, 2.0]);
    assert!(matches!(
        rebin(&data, Dim::X, &wrong_label, &good),
        Err(ArrayError::DimensionNotFound { .. })
    ));

    let wrong_length = edges(Dim::X, vec![0.0, 1.0]);
    assert!(matches!(
        rebin(&data, Dim::X, &wrong_length, &good),
        Err(ArrayError::DimensionLength { .. })
    ));

    let unsorted = edges(Dim::X, vec![0.0, 2.0, 1.0]);
    assert!(matches!(
        rebin(&data, Dim::X, &unsorted, &good),
        Err(ArrayError::EdgesNotSorted { dim: Dim::X })
    ));

    let two_d = counts(&[(Dim::Y, 1), (Dim::X, 3)], vec![0.0, 1.0, 2.0]);
    assert!(matches!(
        rebin(&data, Dim::X, &two_d, &good),
        Err(ArrayError::RankMismatch { .. })
    ));
}
