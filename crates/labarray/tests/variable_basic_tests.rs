#![cfg(feature = "dev")]
//! Tests for Variable construction, access, views, and shape changes.
//!
//! ## Test Organization
//!
//! 1. **Construction** - typed buffers, zeros, scalars, invariants
//! 2. **Typed Access** - values, sparse values, kind mismatches
//! 3. **Slicing** - const views, mutable views, rank-dropping, bounds
//! 4. **Shape Changes** - reshape, transpose, rename, set_dims
//! 5. **Equality** - permutation-insensitive dims, names, units
//! 6. **Value Semantics** - deep-copy behavior of clones

use labarray::prelude::*;

fn dims(pairs: &[(Dim, usize)]) -> Dimensions {
    Dimensions::from_pairs(pairs).unwrap()
}

fn var_2x3() -> Variable {
    Variable::new::<f64>(
        Unit::counts(),
        dims(&[(Dim::Y, 2), (Dim::X, 3)]),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    )
    .unwrap()
}

fn sparse_dims() -> Dimensions {
    let mut d = dims(&[(Dim::Y, 3)]);
    d.add_sparse(Dim::X).unwrap();
    d
}

// ============================================================================
// Construction
// ============================================================================

/// A Variable records unit, dims, and kind; data length must match volume.
#[test]
fn test_new_basic() {
    let v = var_2x3();
    assert_eq!(v.unit(), Unit::counts());
    assert_eq!(v.kind(), ElementKind::Double);
    assert_eq!(v.dims().volume(), 6);
    assert_eq!(v.name(), None);
}

/// A wrong buffer length is rejected.
#[test]
fn test_new_volume_mismatch() {
    let result = Variable::new::<f64>(Unit::counts(), dims(&[(Dim::X, 3)]), vec![1.0, 2.0]);
    assert!(matches!(
        result,
        Err(ArrayError::VolumeMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

/// Zeros default-initialize every kind.
#[test]
fn test_zeros() {
    let v = Variable::zeros(ElementKind::Int64, Unit::dimensionless(), dims(&[(Dim::X, 4)]))
        .unwrap();
    assert_eq!(v.values::<i64>().unwrap(), &[0, 0, 0, 0]);

    let s = Variable::zeros(ElementKind::String, Unit::dimensionless(), dims(&[(Dim::X, 2)]))
        .unwrap();
    assert_eq!(s.values::<String>().unwrap(), &["".to_string(), "".to_string()]);
}

/// A scalar is rank 0 with one element.
#[test]
fn test_scalar() {
    let v = Variable::scalar(2.5f64, Unit::m());
    assert_eq!(v.dims().rank(), 0);
    assert_eq!(v.values::<f64>().unwrap(), &[2.5]);
}

/// Sparse kinds require a sparse shape and vice versa.
#[test]
fn test_sparse_shape_consistency() {
    let dense = dims(&[(Dim::Y, 3)]);
    assert!(matches!(
        Variable::new::<Vec<f64>>(Unit::counts(), dense, vec![vec![]; 3]),
        Err(ArrayError::SparseDimensionRequired { .. })
    ));
    assert!(matches!(
        Variable::new::<f64>(Unit::counts(), sparse_dims(), vec![0.0; 3]),
        Err(ArrayError::UnexpectedSparseDimension { .. })
    ));
}

/// A sparse Variable holds one row per outer index.
#[test]
fn test_sparse_construction() {
    let mut v = Variable::new::<Vec<f64>>(
        Unit::counts(),
        sparse_dims(),
        vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0], vec![6.0, 7.0]],
    )
    .unwrap();
    assert_eq!(v.kind(), ElementKind::SparseDouble);
    assert_eq!(v.sparse_values::<f64>().unwrap().len(), 3);
    assert_eq!(v.sparse_values::<f64>().unwrap()[1], vec![4.0, 5.0]);

    v.sparse_values_mut::<f64>().unwrap()[1].push(9.0);
    assert_eq!(v.sparse_values::<f64>().unwrap()[1], vec![4.0, 5.0, 9.0]);
}

// ============================================================================
// Typed Access
// ============================================================================

/// Asking for the wrong element type is an error, not a panic.
#[test]
fn test_values_kind_mismatch() {
    let v = var_2x3();
    assert!(matches!(
        v.values::<i32>(),
        Err(ArrayError::KindMismatch {
            expected: ElementKind::Double,
            actual: ElementKind::Int32
        })
    ));
    assert!(v.sparse_values::<f64>().is_err());
}

/// Mutable access writes through.
#[test]
fn test_values_mut() {
    let mut v = var_2x3();
    v.values_mut::<f64>().unwrap()[0] = 10.0;
    assert_eq!(v.values::<f64>().unwrap()[0], 10.0);
}

// ============================================================================
// Slicing
// ============================================================================

/// A range slice shrinks the extent; the view materializes on demand.
#[test]
fn test_range_slice() {
    let v = var_2x3();
    let view = v.slice(Slice::range(Dim::X, 1, 3)).unwrap();
    assert_eq!(view.dims(), &dims(&[(Dim::Y, 2), (Dim::X, 2)]));
    let owned = view.to_owned();
    assert_eq!(owned.values::<f64>().unwrap(), &[2.0, 3.0, 5.0, 6.0]);
}

/// A single-index slice drops the dimension.
#[test]
fn test_rank_dropping_slice() {
    let v = var_2x3();
    let row = v.slice(Slice::single(Dim::Y, 1)).unwrap().to_owned();
    assert_eq!(row.dims(), &dims(&[(Dim::X, 3)]));
    assert_eq!(row.values::<f64>().unwrap(), &[4.0, 5.0, 6.0]);
}

/// Slices compose.
#[test]
fn test_slice_of_slice() {
    let v = var_2x3();
    let view = v.slice(Slice::range(Dim::X, 1, 3)).unwrap();
    let cell = view
        .slice(Slice::single(Dim::Y, 1))
        .unwrap()
        .slice(Slice::single(Dim::X, 0))
        .unwrap()
        .to_owned();
    assert_eq!(cell.values::<f64>().unwrap(), &[5.0]);
}

/// Out-of-range descriptors are rejected; begin == end is an empty view.
#[test]
fn test_slice_bounds() {
    let v = var_2x3();
    assert!(matches!(
        v.slice(Slice::single(Dim::X, 3)),
        Err(ArrayError::SliceOutOfRange { .. })
    ));
    assert!(matches!(
        v.slice(Slice::range(Dim::X, 0, 4)),
        Err(ArrayError::SliceOutOfRange { .. })
    ));
    assert!(matches!(
        v.slice(Slice::range(Dim::Z, 0, 1)),
        Err(ArrayError::SliceOutOfRange { .. })
    ));

    let empty = v.slice(Slice::range(Dim::X, 2, 2)).unwrap();
    assert_eq!(empty.dims().volume(), 0);
    assert_eq!(empty.to_owned().values::<f64>().unwrap().len(), 0);
}

/// Assignment through a mutable view writes the parent's buffer.
#[test]
fn test_slice_mut_assign() {
    let mut v = var_2x3();
    let row = Variable::new::<f64>(
        Unit::counts(),
        dims(&[(Dim::X, 3)]),
        vec![10.0, 20.0, 30.0],
    )
    .unwrap();
    v.slice_mut(Slice::single(Dim::Y, 1))
        .unwrap()
        .assign(&row)
        .unwrap();
    assert_eq!(
        v.values::<f64>().unwrap(),
        &[1.0, 2.0, 3.0, 10.0, 20.0, 30.0]
    );
}

/// Assignment checks kind, unit, and dims before writing.
#[test]
fn test_slice_mut_assign_rejections() {
    let mut v = var_2x3();
    let wrong_unit =
        Variable::new::<f64>(Unit::m(), dims(&[(Dim::X, 3)]), vec![0.0; 3]).unwrap();
    let wrong_dims =
        Variable::new::<f64>(Unit::counts(), dims(&[(Dim::X, 2)]), vec![0.0; 2]).unwrap();

    let mut view = v.slice_mut(Slice::single(Dim::Y, 0)).unwrap();
    assert!(matches!(
        view.assign(&wrong_unit),
        Err(ArrayError::UnitMismatch { .. })
    ));
    assert!(matches!(
        view.assign(&wrong_dims),
        Err(ArrayError::DimensionMismatch { .. })
    ));
}

/// `set_slice` copies a lower-rank Variable into one position.
#[test]
fn test_set_slice() {
    let mut v = var_2x3();
    let row = Variable::new::<f64>(
        Unit::counts(),
        dims(&[(Dim::X, 3)]),
        vec![7.0, 8.0, 9.0],
    )
    .unwrap();
    v.set_slice(&row, Dim::Y, 0).unwrap();
    assert_eq!(
        v.values::<f64>().unwrap(),
        &[7.0, 8.0, 9.0, 4.0, 5.0, 6.0]
    );
}

// ============================================================================
// Shape Changes
// ============================================================================

/// Reshape relabels in place on an owned Variable.
#[test]
fn test_reshape_owned() {
    let v = var_2x3().reshape(dims(&[(Dim::Z, 6)])).unwrap();
    assert_eq!(v.dims(), &dims(&[(Dim::Z, 6)]));
    assert_eq!(v.values::<f64>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    assert!(matches!(
        var_2x3().reshape(dims(&[(Dim::Z, 5)])),
        Err(ArrayError::VolumeMismatch { .. })
    ));
}

/// Reshaping a transposed view copies to contiguous order first.
#[test]
fn test_reshape_view_copies() {
    let v = var_2x3();
    let transposed = v.transpose(&[Dim::X, Dim::Y]).unwrap();
    let flat = transposed.reshape(dims(&[(Dim::Z, 6)])).unwrap();
    assert_eq!(flat.values::<f64>().unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

/// Transpose is a view; a double transpose restores the original.
#[test]
fn test_transpose_involution() {
    let v = var_2x3();
    let t = v.transpose(&[Dim::X, Dim::Y]).unwrap().to_owned();
    assert_eq!(t.dims(), &dims(&[(Dim::X, 3), (Dim::Y, 2)]));
    assert_eq!(t.values::<f64>().unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

    let back = t.transpose(&[Dim::Y, Dim::X]).unwrap().to_owned();
    assert_eq!(back, v);

    // An empty order reverses the axes.
    let reversed = v.transpose(&[]).unwrap();
    assert_eq!(reversed.dims().labels(), &[Dim::X, Dim::Y]);
}

/// Rename relabels; a missing source label is a no-op.
#[test]
fn test_rename() {
    let mut v = var_2x3();
    v.rename(Dim::Y, Dim::Spectrum).unwrap();
    assert_eq!(v.dims().labels(), &[Dim::Spectrum, Dim::X]);
    v.rename(Dim::Tof, Dim::Energy).unwrap();
    assert_eq!(v.dims().labels(), &[Dim::Spectrum, Dim::X]);
}

/// `set_dims` keeps data at equal volume, reinitializes otherwise.
#[test]
fn test_set_dims() {
    let mut v = var_2x3();
    v.set_dims(dims(&[(Dim::Z, 6)]));
    assert_eq!(v.values::<f64>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    v.set_dims(dims(&[(Dim::Z, 4)]));
    assert_eq!(v.values::<f64>().unwrap(), &[0.0, 0.0, 0.0, 0.0]);
}

// ============================================================================
// Equality
// ============================================================================

/// Equality ignores dimension order but compares elements in the
/// left-hand side's iteration order.
#[test]
fn test_equality_up_to_permutation() {
    let a = var_2x3();
    let b = Variable::new::<f64>(
        Unit::counts(),
        dims(&[(Dim::X, 3), (Dim::Y, 2)]),
        vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
    )
    .unwrap();
    assert_eq!(a, b);

    let c = Variable::new::<f64>(
        Unit::counts(),
        dims(&[(Dim::X, 3), (Dim::Y, 2)]),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    )
    .unwrap();
    assert_ne!(a, c);
}

/// Units, names, and kinds all participate in equality.
#[test]
fn test_equality_metadata() {
    let a = var_2x3();
    let mut b = var_2x3();
    b.set_unit(Unit::m());
    assert_ne!(a, b);

    let mut c = var_2x3();
    c.set_name(Some("signal".to_string()));
    assert_ne!(a, c);

    let d = Variable::new::<f32>(
        Unit::counts(),
        dims(&[(Dim::Y, 2), (Dim::X, 3)]),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    )
    .unwrap();
    assert_ne!(a, d);
}

/// A slice compares equal to the Variable holding the same region.
#[test]
fn test_slice_equality() {
    let v = var_2x3();
    let row = Variable::new::<f64>(
        Unit::counts(),
        dims(&[(Dim::X, 3)]),
        vec![4.0, 5.0, 6.0],
    )
    .unwrap();
    let view = v.slice(Slice::single(Dim::Y, 1)).unwrap();
    assert_eq!(view, row);
}

// ============================================================================
// Value Semantics
// ============================================================================

/// Clones behave as deep copies: mutating one side never shows through
/// the other.
#[test]
fn test_clone_is_deep_in_effect() {
    let mut a = var_2x3();
    let b = a.clone();
    a.values_mut::<f64>().unwrap()[0] = 99.0;
    assert_eq!(b.values::<f64>().unwrap()[0], 1.0);
    assert_ne!(a, b);
}
