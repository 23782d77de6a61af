//! Type-erased element storage.
//!
//! ## Purpose
//!
//! This module owns the data behind every Variable: one contiguous buffer
//! per element kind, wrapped in a tagged variant so the set of kinds is
//! closed and dispatch is a match on the tag. It implements the three
//! type-erased primitives everything else is built from: in-place binary
//! ops with label alignment, block copies along a dimension, and deep
//! equality under a chosen iteration order.
//!
//! ## Design notes
//!
//! * **Tagged variant**: No class hierarchy, no downcasts. A mismatched
//!   element kind is a miss in the match table and surfaces as a
//!   `KindMismatch` error.
//! * **Copy-on-write**: Buffers are `Arc`-backed; cloning a Variable is
//!   O(1) and the first mutation detaches. Observationally this is deep
//!   copying.
//! * **Alignment in one place**: `binary_in_place` resolves the
//!   contains / is-contained / mismatch cases once; kernels only see two
//!   stride layouts over flat buffers.
//! * **Contiguous fast path**: When both layouts are contiguous the
//!   kernels run over plain slices.
//!
//! ## Invariants
//!
//! * Buffer length equals the shape's volume (outer row count for sparse
//!   kinds).
//! * In-place operations perform no write before every precondition check
//!   has passed.
//! * Accumulating walks iterate in target-dims lexicographic order, so
//!   floating-point results are reproducible.
//!
//! ## Non-goals
//!
//! * This module does not know about units or names (variable layer).
//! * This module does not implement rebinning or event binning
//!   (algorithms layer); it only provides the access primitives.

// External dependencies
use num_traits::Num;
use std::sync::Arc;

// Internal dependencies
use crate::dataset::Dataset;
use crate::primitives::{ArrayError, Dim, Dimensions, ElementKind};
use crate::view::StridedLayout;

// Dispatch a generic expression over the concrete type of a kind tag.
macro_rules! dispatch_element {
    ($kind:expr, $T:ident => $body:expr) => {
        match $kind {
            ElementKind::Double => {
                type $T = f64;
                $body
            }
            ElementKind::Float => {
                type $T = f32;
                $body
            }
            ElementKind::Int32 => {
                type $T = i32;
                $body
            }
            ElementKind::Int64 => {
                type $T = i64;
                $body
            }
            ElementKind::Bool => {
                type $T = bool;
                $body
            }
            ElementKind::String => {
                type $T = ::std::string::String;
                $body
            }
            ElementKind::Vector3 => {
                type $T = [f64; 3];
                $body
            }
            ElementKind::Dataset => {
                type $T = crate::dataset::Dataset;
                $body
            }
            ElementKind::SparseDouble => {
                type $T = Vec<f64>;
                $body
            }
            ElementKind::SparseFloat => {
                type $T = Vec<f32>;
                $body
            }
            ElementKind::SparseInt64 => {
                type $T = Vec<i64>;
                $body
            }
        }
    };
}

// ============================================================================
// Storage
// ============================================================================

/// Type-erased ownership of a contiguous buffer of one element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Double(Arc<Vec<f64>>),
    Float(Arc<Vec<f32>>),
    Int32(Arc<Vec<i32>>),
    Int64(Arc<Vec<i64>>),
    Bool(Arc<Vec<bool>>),
    String(Arc<Vec<String>>),
    Vector3(Arc<Vec<[f64; 3]>>),
    Dataset(Arc<Vec<Dataset>>),
    SparseDouble(Arc<Vec<Vec<f64>>>),
    SparseFloat(Arc<Vec<Vec<f32>>>),
    SparseInt64(Arc<Vec<Vec<i64>>>),
}

impl Storage {
    /// The element-kind tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            Storage::Double(_) => ElementKind::Double,
            Storage::Float(_) => ElementKind::Float,
            Storage::Int32(_) => ElementKind::Int32,
            Storage::Int64(_) => ElementKind::Int64,
            Storage::Bool(_) => ElementKind::Bool,
            Storage::String(_) => ElementKind::String,
            Storage::Vector3(_) => ElementKind::Vector3,
            Storage::Dataset(_) => ElementKind::Dataset,
            Storage::SparseDouble(_) => ElementKind::SparseDouble,
            Storage::SparseFloat(_) => ElementKind::SparseFloat,
            Storage::SparseInt64(_) => ElementKind::SparseInt64,
        }
    }

    /// Element count (outer row count for sparse kinds).
    pub fn len(&self) -> usize {
        match self {
            Storage::Double(v) => v.len(),
            Storage::Float(v) => v.len(),
            Storage::Int32(v) => v.len(),
            Storage::Int64(v) => v.len(),
            Storage::Bool(v) => v.len(),
            Storage::String(v) => v.len(),
            Storage::Vector3(v) => v.len(),
            Storage::Dataset(v) => v.len(),
            Storage::SparseDouble(v) => v.len(),
            Storage::SparseFloat(v) => v.len(),
            Storage::SparseInt64(v) => v.len(),
        }
    }

    /// True when the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh default-initialized buffer of the given kind and length.
    pub fn default_with(kind: ElementKind, len: usize) -> Storage {
        dispatch_element!(kind, T => T::into_storage(vec![T::default_value(); len]))
    }
}

// ============================================================================
// Element Trait
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// A concrete Rust type inhabiting one element kind.
///
/// Sealed: the kind set is closed, so only the types listed here implement
/// the trait. Sparse kinds are inhabited by their per-row container type
/// (`Vec<f64>` for `SparseDouble`, and so on).
pub trait Element: Clone + PartialEq + std::fmt::Debug + sealed::Sealed {
    /// The tag this type inhabits.
    const KIND: ElementKind;

    /// Wrap an owned buffer into type-erased storage.
    fn into_storage(values: Vec<Self>) -> Storage;

    /// Typed read access; `None` on a kind mismatch.
    fn values(storage: &Storage) -> Option<&[Self]>;

    /// Typed write access, detaching shared buffers; `None` on a kind
    /// mismatch.
    fn values_mut(storage: &mut Storage) -> Option<&mut Vec<Self>>;

    /// The default element used by zero/resize initialization.
    fn default_value() -> Self;
}

macro_rules! impl_element {
    ($t:ty, $kind:ident, $default:expr) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;

            fn into_storage(values: Vec<Self>) -> Storage {
                Storage::$kind(Arc::new(values))
            }

            fn values(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$kind(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn values_mut(storage: &mut Storage) -> Option<&mut Vec<Self>> {
                match storage {
                    Storage::$kind(v) => Some(Arc::make_mut(v)),
                    _ => None,
                }
            }

            fn default_value() -> Self {
                $default
            }
        }
    };
}

impl_element!(f64, Double, 0.0);
impl_element!(f32, Float, 0.0);
impl_element!(i32, Int32, 0);
impl_element!(i64, Int64, 0);
impl_element!(bool, Bool, false);
impl_element!(String, String, String::new());
impl_element!([f64; 3], Vector3, [0.0; 3]);
impl_element!(Dataset, Dataset, Dataset::new());
impl_element!(Vec<f64>, SparseDouble, Vec::new());
impl_element!(Vec<f32>, SparseFloat, Vec::new());
impl_element!(Vec<i64>, SparseInt64, Vec::new());

// ============================================================================
// Borrowed Lenses
// ============================================================================

/// A const lens onto a storage region: the buffer, the dims in view, the
/// dims the buffer was laid out with, and the flat offset of the first
/// visible element.
#[derive(Clone, Copy)]
pub(crate) struct Raw<'a> {
    pub(crate) storage: &'a Storage,
    pub(crate) visible: &'a Dimensions,
    pub(crate) parent: &'a Dimensions,
    pub(crate) base: usize,
}

/// The mutable counterpart of [`Raw`].
pub(crate) struct RawMut<'a> {
    pub(crate) storage: &'a mut Storage,
    pub(crate) visible: &'a Dimensions,
    pub(crate) parent: &'a Dimensions,
    pub(crate) base: usize,
}

// ============================================================================
// Binary Operations
// ============================================================================

/// The elementwise binary operations storage knows how to apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Or,
}

impl BinOp {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "subtract",
            BinOp::Mul => "multiply",
            BinOp::Div => "divide",
            BinOp::Or => "or",
        }
    }
}

/// Apply `lhs = lhs ⊕ rhs` elementwise with label alignment.
///
/// When the left dims contain the right dims the right side broadcasts;
/// when the right dims contain the left dims the walk is reduction-shaped
/// and accumulates into the left side (used by `sum`); equal-modulo-order
/// dims are bridged by a transposing layout. Anything else is a hard
/// error, checked before any write.
pub(crate) fn binary_in_place(
    lhs: RawMut<'_>,
    rhs: Raw<'_>,
    op: BinOp,
) -> Result<(), ArrayError> {
    let kind = lhs.storage.kind();
    let rhs_kind = rhs.storage.kind();
    if kind != rhs_kind {
        return Err(ArrayError::KindMismatch {
            expected: kind,
            actual: rhs_kind,
        });
    }
    if kind.is_sparse() {
        return sparse_in_place(lhs, rhs, op);
    }
    match op {
        BinOp::Or => {
            if kind != ElementKind::Bool {
                return Err(ArrayError::NotArithmetic { kind });
            }
        }
        _ => {
            if !kind.is_arithmetic() {
                return Err(ArrayError::NotArithmetic { kind });
            }
        }
    }

    let target = if lhs.visible.contains_dims(rhs.visible) {
        lhs.visible
    } else if rhs.visible.contains_dims(lhs.visible) {
        // Reduction-shaped: the left side is written repeatedly.
        rhs.visible
    } else {
        return Err(ArrayError::DimensionMismatch {
            expected: lhs.visible.clone(),
            actual: rhs.visible.clone(),
        });
    };
    let out = StridedLayout::new(target, lhs.visible, lhs.parent, lhs.base)?;
    let inp = StridedLayout::new(target, rhs.visible, rhs.parent, rhs.base)?;

    match (&mut *lhs.storage, rhs.storage) {
        (Storage::Double(a), Storage::Double(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            numeric_in_place(a, &out, b, &inp, op, kind)
        }
        (Storage::Float(a), Storage::Float(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            numeric_in_place(a, &out, b, &inp, op, kind)
        }
        (Storage::Int32(a), Storage::Int32(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            numeric_in_place(a, &out, b, &inp, op, kind)
        }
        (Storage::Int64(a), Storage::Int64(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            numeric_in_place(a, &out, b, &inp, op, kind)
        }
        (Storage::Bool(a), Storage::Bool(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            apply_binary(a, &out, b, &inp, |x, y| x | y);
            Ok(())
        }
        _ => Err(ArrayError::NotArithmetic { kind }),
    }
}

fn numeric_in_place<T: Copy + Num>(
    a: &mut [T],
    la: &StridedLayout,
    b: &[T],
    lb: &StridedLayout,
    op: BinOp,
    kind: ElementKind,
) -> Result<(), ArrayError> {
    match op {
        BinOp::Add => apply_binary(a, la, b, lb, |x, y| x + y),
        BinOp::Sub => apply_binary(a, la, b, lb, |x, y| x - y),
        BinOp::Mul => apply_binary(a, la, b, lb, |x, y| x * y),
        BinOp::Div => apply_binary(a, la, b, lb, |x, y| x / y),
        BinOp::Or => return Err(ArrayError::NotArithmetic { kind }),
    }
    Ok(())
}

fn apply_binary<T: Copy, F: Fn(T, T) -> T>(
    a: &mut [T],
    la: &StridedLayout,
    b: &[T],
    lb: &StridedLayout,
    f: F,
) {
    if la.is_contiguous() && lb.is_contiguous() {
        let n = la.len();
        let dst = &mut a[la.base()..la.base() + n];
        let src = &b[lb.base()..lb.base() + n];
        for (x, &y) in dst.iter_mut().zip(src) {
            *x = f(*x, y);
        }
    } else {
        for (i, j) in la.offsets().zip(lb.offsets()) {
            a[i] = f(a[i], b[j]);
        }
    }
}

/// The fused-special path: `+=` on event lists appends per row; every
/// other operator is unsupported for event lists.
fn sparse_in_place(lhs: RawMut<'_>, rhs: Raw<'_>, op: BinOp) -> Result<(), ArrayError> {
    if op != BinOp::Add {
        return Err(ArrayError::SparseUnsupported { operation: op.name() });
    }
    if lhs.visible != rhs.visible {
        return Err(ArrayError::DimensionMismatch {
            expected: lhs.visible.clone(),
            actual: rhs.visible.clone(),
        });
    }
    let lhs_visible = lhs.visible.dense_subset();
    let lhs_parent = lhs.parent.dense_subset();
    let rhs_visible = rhs.visible.dense_subset();
    let rhs_parent = rhs.parent.dense_subset();
    let out = StridedLayout::new(&lhs_visible, &lhs_visible, &lhs_parent, lhs.base)?;
    let inp = StridedLayout::new(&lhs_visible, &rhs_visible, &rhs_parent, rhs.base)?;

    match (&mut *lhs.storage, rhs.storage) {
        (Storage::SparseDouble(a), Storage::SparseDouble(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            append_rows(a, &out, b, &inp)
        }
        (Storage::SparseFloat(a), Storage::SparseFloat(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            append_rows(a, &out, b, &inp)
        }
        (Storage::SparseInt64(a), Storage::SparseInt64(b)) => {
            let a = Arc::make_mut(a).as_mut_slice();
            append_rows(a, &out, b, &inp)
        }
        _ => Err(ArrayError::SparseUnsupported { operation: op.name() }),
    }
}

fn append_rows<T: Clone>(
    a: &mut [Vec<T>],
    la: &StridedLayout,
    b: &[Vec<T>],
    lb: &StridedLayout,
) -> Result<(), ArrayError> {
    for (i, j) in la.offsets().zip(lb.offsets()) {
        let row = b[j].clone();
        a[i].extend(row);
    }
    Ok(())
}

// ============================================================================
// Block Copy
// ============================================================================

// Base-offset shift for positioning a copy along `dim`.
fn shift(dims: &Dimensions, dim: Option<Dim>, index: usize) -> usize {
    match dim {
        Some(d) => match dims.stride(d) {
            Some(stride) => index * stride,
            None => index * dims.volume(),
        },
        None => 0,
    }
}

/// Copy the block `[begin, end)` along `dim` of `src` into `dst` starting
/// at `offset` along the same dimension. With `dim == None` the whole
/// visible region is copied. Axes of the destination absent from the
/// source broadcast.
pub(crate) fn copy_into(
    dst: RawMut<'_>,
    dim: Option<Dim>,
    offset: usize,
    src: Raw<'_>,
    begin: usize,
    end: usize,
) -> Result<(), ArrayError> {
    let kind = dst.storage.kind();
    let src_kind = src.storage.kind();
    if kind != src_kind {
        return Err(ArrayError::KindMismatch {
            expected: kind,
            actual: src_kind,
        });
    }
    let sparse = kind.is_sparse();
    let dst_visible = if sparse { dst.visible.dense_subset() } else { dst.visible.clone() };
    let dst_parent = if sparse { dst.parent.dense_subset() } else { dst.parent.clone() };
    let src_visible = if sparse { src.visible.dense_subset() } else { src.visible.clone() };
    let src_parent = if sparse { src.parent.dense_subset() } else { src.parent.clone() };

    let mut iter_dims = dst_visible.clone();
    if let Some(d) = dim {
        if iter_dims.contains(d) {
            iter_dims.resize(d, end - begin)?;
        }
    }
    let dst_base = dst.base + shift(&dst_parent, dim, offset);
    let src_base = src.base + shift(&src_parent, dim, begin);
    let dst_layout = StridedLayout::new(&iter_dims, &dst_visible, &dst_parent, dst_base)?;
    let src_layout = StridedLayout::new(&iter_dims, &src_visible, &src_parent, src_base)?;

    dispatch_element!(kind, T => copy_elements::<T>(dst.storage, &dst_layout, src.storage, &src_layout))
}

fn copy_elements<T: Element>(
    dst: &mut Storage,
    dst_layout: &StridedLayout,
    src: &Storage,
    src_layout: &StridedLayout,
) -> Result<(), ArrayError> {
    let src_kind = src.kind();
    let src_vals = T::values(src).ok_or(ArrayError::KindMismatch {
        expected: T::KIND,
        actual: src_kind,
    })?;
    let dst_kind = dst.kind();
    let dst_vals = T::values_mut(dst).ok_or(ArrayError::KindMismatch {
        expected: T::KIND,
        actual: dst_kind,
    })?;
    for (i, j) in dst_layout.offsets().zip(src_layout.offsets()) {
        dst_vals[i] = src_vals[j].clone();
    }
    Ok(())
}

/// Materialize the region seen through `src` into a fresh contiguous
/// buffer of the same kind, in the view's lexicographic order.
///
/// Unlike [`copy_into`] this cannot fail: the visible dims of a view are
/// a sub-view of its parent by construction, so the layout always exists
/// and the output length equals the visible volume.
pub(crate) fn materialize(src: Raw<'_>) -> Storage {
    let kind = src.storage.kind();
    let sparse = kind.is_sparse();
    let visible = if sparse { src.visible.dense_subset() } else { src.visible.clone() };
    let parent = if sparse { src.parent.dense_subset() } else { src.parent.clone() };
    let layout = match StridedLayout::new(&visible, &visible, &parent, src.base) {
        Ok(layout) => layout,
        // A view's visible labels are drawn from its parent's.
        Err(_) => unreachable!(),
    };
    dispatch_element!(kind, T => collect_elements::<T>(src.storage, &layout))
}

fn collect_elements<T: Element>(src: &Storage, layout: &StridedLayout) -> Storage {
    let src_vals = match T::values(src) {
        Some(vals) => vals,
        // The kind tag selected this instantiation.
        None => unreachable!(),
    };
    let mut out = Vec::with_capacity(layout.len());
    for i in layout.offsets() {
        out.push(src_vals[i].clone());
    }
    T::into_storage(out)
}

// ============================================================================
// Equality
// ============================================================================

/// Deep elementwise equality under the left-hand side's iteration order.
/// The caller is responsible for having checked that the dims are a
/// permutation of one another.
pub(crate) fn equals_under(lhs: Raw<'_>, rhs: Raw<'_>) -> bool {
    let kind = lhs.storage.kind();
    if kind != rhs.storage.kind() {
        return false;
    }
    let sparse = kind.is_sparse();
    let lhs_visible = if sparse { lhs.visible.dense_subset() } else { lhs.visible.clone() };
    let lhs_parent = if sparse { lhs.parent.dense_subset() } else { lhs.parent.clone() };
    let rhs_visible = if sparse { rhs.visible.dense_subset() } else { rhs.visible.clone() };
    let rhs_parent = if sparse { rhs.parent.dense_subset() } else { rhs.parent.clone() };

    let ll = match StridedLayout::new(&lhs_visible, &lhs_visible, &lhs_parent, lhs.base) {
        Ok(layout) => layout,
        Err(_) => return false,
    };
    let rl = match StridedLayout::new(&lhs_visible, &rhs_visible, &rhs_parent, rhs.base) {
        Ok(layout) => layout,
        Err(_) => return false,
    };
    if ll.len() != rl.len() {
        return false;
    }
    dispatch_element!(kind, T => eq_elements::<T>(lhs.storage, &ll, rhs.storage, &rl))
}

fn eq_elements<T: Element>(
    a: &Storage,
    la: &StridedLayout,
    b: &Storage,
    lb: &StridedLayout,
) -> bool {
    match (T::values(a), T::values(b)) {
        (Some(av), Some(bv)) => la.offsets().zip(lb.offsets()).all(|(i, j)| av[i] == bv[j]),
        _ => false,
    }
}
