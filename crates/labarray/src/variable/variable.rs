//! The `Variable` value type and its borrowed slice views.
//!
//! ## Purpose
//!
//! A [`Variable`] is the engine's unit of data: a physical unit, an
//! ordered set of labeled dimensions, an optional name, and type-erased
//! storage. It is a value — cloning is deep in effect (copy-on-write
//! internally) — while [`VariableSlice`] and [`VariableSliceMut`] are
//! borrowed lenses onto a sub-region that carry no data of their own.
//!
//! ## Design notes
//!
//! * **Views are borrows**: A mutable view borrows its Variable
//!   exclusively; a const view shares. A view cannot outlive its parent,
//!   mutate through a const borrow, or be resized — the borrow checker
//!   rules all of that out, so no runtime state errors exist for it.
//! * **Typed access**: `values::<T>()` hands out a typed span; asking for
//!   the wrong type is a `KindMismatch`, not a panic.
//! * **Equality up to permutation**: Two Variables are equal when units,
//!   names, kinds, and dims-as-sets agree and the elements agree under
//!   the left-hand side's iteration order.
//!
//! ## Invariants
//!
//! * `data.len() == dims.volume()` (outer row count for sparse kinds).
//! * A rank-dropping slice erases the sliced dimension from the view's
//!   dims; a range slice shrinks its extent.

// Internal dependencies
use crate::primitives::{ArrayError, Dim, Dimensions, ElementKind, Slice, Unit};
use crate::storage::{self, Element, Raw, RawMut, Storage};

// ============================================================================
// Variable
// ============================================================================

/// A labeled multi-dimensional array with a unit.
#[derive(Debug, Clone)]
pub struct Variable {
    pub(crate) unit: Unit,
    pub(crate) dims: Dimensions,
    pub(crate) name: Option<String>,
    pub(crate) data: Storage,
}

impl Variable {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a Variable from a typed buffer.
    ///
    /// The buffer length must equal the volume of `dims`; sparse element
    /// kinds require a sparse shape (one container per outer row) and
    /// dense kinds a dense one.
    pub fn new<T: Element>(
        unit: Unit,
        dims: Dimensions,
        values: Vec<T>,
    ) -> Result<Variable, ArrayError> {
        if T::KIND.is_sparse() && !dims.sparse() {
            return Err(ArrayError::SparseDimensionRequired { dims });
        }
        if !T::KIND.is_sparse() && dims.sparse() {
            return Err(ArrayError::UnexpectedSparseDimension { dims });
        }
        if values.len() != dims.volume() {
            return Err(ArrayError::VolumeMismatch {
                expected: dims.volume(),
                actual: values.len(),
            });
        }
        Ok(Variable {
            unit,
            dims,
            name: None,
            data: T::into_storage(values),
        })
    }

    /// Create a default-initialized Variable of the given kind.
    pub fn zeros(kind: ElementKind, unit: Unit, dims: Dimensions) -> Result<Variable, ArrayError> {
        if kind.is_sparse() && !dims.sparse() {
            return Err(ArrayError::SparseDimensionRequired { dims });
        }
        if !kind.is_sparse() && dims.sparse() {
            return Err(ArrayError::UnexpectedSparseDimension { dims });
        }
        let data = Storage::default_with(kind, dims.volume());
        Ok(Variable {
            unit,
            dims,
            name: None,
            data,
        })
    }

    /// Create a rank-0 Variable holding a single value.
    pub fn scalar<T: Element>(value: T, unit: Unit) -> Variable {
        Variable {
            unit,
            dims: Dimensions::new(),
            name: None,
            data: T::into_storage(vec![value]),
        }
    }

    // A fresh default-initialized Variable sharing this one's unit, name,
    // and element kind, shaped by `dims`.
    pub(crate) fn make_default_from(&self, dims: Dimensions) -> Variable {
        Variable {
            unit: self.unit,
            name: self.name.clone(),
            data: Storage::default_with(self.data.kind(), dims.volume()),
            dims,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The unit of measurement.
    #[inline]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Replace the unit.
    #[inline]
    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// The shape.
    #[inline]
    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// The element-kind tag.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// The optional name (used by dataset aggregation).
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set or clear the name.
    #[inline]
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Typed read access to the elements.
    pub fn values<T: Element>(&self) -> Result<&[T], ArrayError> {
        T::values(&self.data).ok_or(ArrayError::KindMismatch {
            expected: self.data.kind(),
            actual: T::KIND,
        })
    }

    /// Typed write access to the elements.
    pub fn values_mut<T: Element>(&mut self) -> Result<&mut [T], ArrayError> {
        let kind = self.data.kind();
        match T::values_mut(&mut self.data) {
            Some(v) => Ok(v.as_mut_slice()),
            None => Err(ArrayError::KindMismatch {
                expected: kind,
                actual: T::KIND,
            }),
        }
    }

    /// Per-row typed read access to event lists.
    pub fn sparse_values<T>(&self) -> Result<&[Vec<T>], ArrayError>
    where
        Vec<T>: Element,
    {
        <Vec<T> as Element>::values(&self.data).ok_or(ArrayError::KindMismatch {
            expected: self.data.kind(),
            actual: <Vec<T> as Element>::KIND,
        })
    }

    /// Per-row typed write access to event lists.
    pub fn sparse_values_mut<T>(&mut self) -> Result<&mut [Vec<T>], ArrayError>
    where
        Vec<T>: Element,
    {
        let kind = self.data.kind();
        match <Vec<T> as Element>::values_mut(&mut self.data) {
            Some(v) => Ok(v.as_mut_slice()),
            None => Err(ArrayError::KindMismatch {
                expected: kind,
                actual: <Vec<T> as Element>::KIND,
            }),
        }
    }

    // ========================================================================
    // Shape Changes
    // ========================================================================

    /// Replace the shape. Keeps the data when the volume is unchanged,
    /// otherwise reinitializes to defaults.
    pub fn set_dims(&mut self, dims: Dimensions) {
        if dims.volume() != self.dims.volume() || dims.sparse() != self.dims.sparse() {
            self.data = Storage::default_with(self.data.kind(), dims.volume());
        }
        self.dims = dims;
    }

    /// Relabel to an equal-volume dense shape in place.
    pub fn reshape(mut self, dims: Dimensions) -> Result<Variable, ArrayError> {
        if self.dims.sparse() {
            return Err(ArrayError::UnexpectedSparseDimension {
                dims: self.dims.clone(),
            });
        }
        if dims.sparse() {
            return Err(ArrayError::UnexpectedSparseDimension { dims });
        }
        if dims.volume() != self.dims.volume() {
            return Err(ArrayError::VolumeMismatch {
                expected: self.dims.volume(),
                actual: dims.volume(),
            });
        }
        self.dims = dims;
        Ok(self)
    }

    /// Rename a dimension label. A missing `from` label is a no-op.
    pub fn rename(&mut self, from: Dim, to: Dim) -> Result<(), ArrayError> {
        match self.dims.index(from) {
            Some(i) => self.dims.relabel(i, to),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// A const view of the sub-region selected by `slice`.
    pub fn slice(&self, slice: Slice) -> Result<VariableSlice<'_>, ArrayError> {
        let (dims, base) = sliced_dims(&self.dims, &self.dims, &slice)?;
        Ok(VariableSlice {
            parent: self,
            dims,
            base,
        })
    }

    /// A mutable view of the sub-region selected by `slice`.
    pub fn slice_mut(&mut self, slice: Slice) -> Result<VariableSliceMut<'_>, ArrayError> {
        let (dims, base) = sliced_dims(&self.dims, &self.dims, &slice)?;
        Ok(VariableSliceMut {
            parent: self,
            dims,
            base,
        })
    }

    /// An axis-reordering view. An empty `order` reverses the axes.
    pub fn transpose(&self, order: &[Dim]) -> Result<VariableSlice<'_>, ArrayError> {
        let dims = permuted_dims(&self.dims, order)?;
        Ok(VariableSlice {
            parent: self,
            dims,
            base: 0,
        })
    }

    /// Copy `slice` into position `index` along `dim`.
    pub fn set_slice(
        &mut self,
        slice: &Variable,
        dim: Dim,
        index: usize,
    ) -> Result<(), ArrayError> {
        if self.unit != slice.unit {
            return Err(ArrayError::UnitMismatch {
                expected: self.unit,
                actual: slice.unit,
            });
        }
        if !self.dims.contains_dims(&slice.dims) {
            return Err(ArrayError::DimensionMismatch {
                expected: self.dims.clone(),
                actual: slice.dims.clone(),
            });
        }
        let Variable { data, dims, .. } = self;
        storage::copy_into(
            RawMut {
                storage: data,
                visible: &*dims,
                parent: &*dims,
                base: 0,
            },
            Some(dim),
            index,
            slice.raw(),
            0,
            1,
        )
    }

    // ========================================================================
    // Internal Lenses
    // ========================================================================

    pub(crate) fn raw(&self) -> Raw<'_> {
        Raw {
            storage: &self.data,
            visible: &self.dims,
            parent: &self.dims,
            base: 0,
        }
    }

    pub(crate) fn raw_mut(&mut self) -> RawMut<'_> {
        let Variable { data, dims, .. } = self;
        RawMut {
            storage: data,
            visible: &*dims,
            parent: &*dims,
            base: 0,
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        parts_equal(
            self.unit,
            self.name.as_deref(),
            &self.dims,
            self.raw(),
            other.unit,
            other.name.as_deref(),
            &other.dims,
            other.raw(),
        )
    }
}

// ============================================================================
// Const Views
// ============================================================================

/// A borrowed const view onto a sub-region of a Variable.
#[derive(Debug, Clone)]
pub struct VariableSlice<'a> {
    pub(crate) parent: &'a Variable,
    pub(crate) dims: Dimensions,
    pub(crate) base: usize,
}

impl<'a> VariableSlice<'a> {
    /// The view's shape.
    #[inline]
    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// The parent's unit.
    #[inline]
    pub fn unit(&self) -> Unit {
        self.parent.unit
    }

    /// The parent's element-kind tag.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.parent.data.kind()
    }

    /// The parent's name.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.parent.name.as_deref()
    }

    /// Materialize the viewed region into an owned, contiguous Variable.
    pub fn to_owned(&self) -> Variable {
        Variable {
            unit: self.parent.unit,
            dims: self.dims.clone(),
            name: self.parent.name.clone(),
            data: storage::materialize(self.raw()),
        }
    }

    /// A further slice of this view.
    pub fn slice(&self, slice: Slice) -> Result<VariableSlice<'a>, ArrayError> {
        let (dims, offset) = sliced_dims(&self.dims, &self.parent.dims, &slice)?;
        Ok(VariableSlice {
            parent: self.parent,
            dims,
            base: self.base + offset,
        })
    }

    /// An axis-reordering view of the same region.
    pub fn transpose(&self, order: &[Dim]) -> Result<VariableSlice<'a>, ArrayError> {
        let dims = permuted_dims(&self.dims, order)?;
        Ok(VariableSlice {
            parent: self.parent,
            dims,
            base: self.base,
        })
    }

    /// Reshape by copy: a view is not contiguous in general, so the data
    /// is materialized first.
    pub fn reshape(&self, dims: Dimensions) -> Result<Variable, ArrayError> {
        self.to_owned().reshape(dims)
    }

    pub(crate) fn raw(&self) -> Raw<'_> {
        Raw {
            storage: &self.parent.data,
            visible: &self.dims,
            parent: &self.parent.dims,
            base: self.base,
        }
    }
}

impl PartialEq for VariableSlice<'_> {
    fn eq(&self, other: &Self) -> bool {
        parts_equal(
            self.unit(),
            self.name(),
            &self.dims,
            self.raw(),
            other.unit(),
            other.name(),
            &other.dims,
            other.raw(),
        )
    }
}

impl PartialEq<Variable> for VariableSlice<'_> {
    fn eq(&self, other: &Variable) -> bool {
        parts_equal(
            self.unit(),
            self.name(),
            &self.dims,
            self.raw(),
            other.unit,
            other.name.as_deref(),
            &other.dims,
            other.raw(),
        )
    }
}

impl PartialEq<VariableSlice<'_>> for Variable {
    fn eq(&self, other: &VariableSlice<'_>) -> bool {
        parts_equal(
            self.unit,
            self.name.as_deref(),
            &self.dims,
            self.raw(),
            other.unit(),
            other.name(),
            &other.dims,
            other.raw(),
        )
    }
}

// ============================================================================
// Mutable Views
// ============================================================================

/// A borrowed mutable view onto a sub-region of a Variable.
///
/// While it exists the parent is exclusively borrowed; assignment and
/// arithmetic write through to the parent's buffer.
#[derive(Debug)]
pub struct VariableSliceMut<'a> {
    pub(crate) parent: &'a mut Variable,
    pub(crate) dims: Dimensions,
    pub(crate) base: usize,
}

impl<'a> VariableSliceMut<'a> {
    /// The view's shape.
    #[inline]
    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// The parent's unit.
    #[inline]
    pub fn unit(&self) -> Unit {
        self.parent.unit
    }

    /// The parent's element-kind tag.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.parent.data.kind()
    }

    /// A const view of the same region.
    pub fn as_const(&self) -> VariableSlice<'_> {
        VariableSlice {
            parent: &*self.parent,
            dims: self.dims.clone(),
            base: self.base,
        }
    }

    /// Overwrite the viewed region with `other`'s elements.
    ///
    /// Kind, unit, and dims must match exactly; the name is not assigned.
    pub fn assign(&mut self, other: &Variable) -> Result<(), ArrayError> {
        let kind = self.kind();
        if kind != other.data.kind() {
            return Err(ArrayError::KindMismatch {
                expected: kind,
                actual: other.data.kind(),
            });
        }
        if self.unit() != other.unit {
            return Err(ArrayError::UnitMismatch {
                expected: self.unit(),
                actual: other.unit,
            });
        }
        if self.dims != other.dims {
            return Err(ArrayError::DimensionMismatch {
                expected: self.dims.clone(),
                actual: other.dims.clone(),
            });
        }
        let parent = &mut *self.parent;
        storage::copy_into(
            RawMut {
                storage: &mut parent.data,
                visible: &self.dims,
                parent: &parent.dims,
                base: self.base,
            },
            None,
            0,
            other.raw(),
            0,
            1,
        )
    }

    // True when the view covers the whole parent (unit changes are only
    // legal then).
    pub(crate) fn spans_whole(&self) -> bool {
        self.dims == self.parent.dims
    }
}

// ============================================================================
// Helpers
// ============================================================================

// Shape and base offset of a slice view: erase the dimension for a
// single-index slice, shrink it for a range slice.
fn sliced_dims(
    visible: &Dimensions,
    parent: &Dimensions,
    slice: &Slice,
) -> Result<(Dimensions, usize), ArrayError> {
    let extent = match visible.extent(slice.dim) {
        Some(extent) => extent,
        None => {
            return Err(ArrayError::SliceOutOfRange {
                slice: *slice,
                dims: visible.clone(),
            })
        }
    };
    let in_range = match slice.end {
        None => slice.begin < extent,
        Some(end) => slice.begin <= end && end <= extent,
    };
    if !in_range {
        return Err(ArrayError::SliceOutOfRange {
            slice: *slice,
            dims: visible.clone(),
        });
    }
    let stride = match parent.stride(slice.dim) {
        Some(stride) => stride,
        None => {
            return Err(ArrayError::SliceOutOfRange {
                slice: *slice,
                dims: parent.clone(),
            })
        }
    };
    let mut dims = visible.clone();
    match slice.end {
        None => dims.erase(slice.dim)?,
        Some(end) => dims.resize(slice.dim, end - slice.begin)?,
    }
    Ok((dims, slice.begin * stride))
}

// Axis order for a transposing view; an empty order reverses.
fn permuted_dims(dims: &Dimensions, order: &[Dim]) -> Result<Dimensions, ArrayError> {
    let order: Vec<Dim> = if order.is_empty() {
        dims.labels().iter().rev().copied().collect()
    } else {
        order.to_vec()
    };
    if order.len() != dims.rank() {
        return Err(ArrayError::RankMismatch {
            expected: dims.rank(),
            actual: order.len(),
        });
    }
    let mut out = Dimensions::new();
    for &label in &order {
        if let Some(extent) = dims.extent(label) {
            out.add(label, extent)?;
        } else if dims.sparse_dim() == Some(label) {
            out.add_sparse(label)?;
        } else {
            return Err(ArrayError::DimensionNotFound {
                dim: label,
                dims: dims.clone(),
            });
        }
    }
    Ok(out)
}

// Shared equality core: units, names, kinds, dims up to permutation, and
// elements under the left-hand side's iteration order.
#[allow(clippy::too_many_arguments)]
fn parts_equal(
    lhs_unit: Unit,
    lhs_name: Option<&str>,
    lhs_dims: &Dimensions,
    lhs_raw: Raw<'_>,
    rhs_unit: Unit,
    rhs_name: Option<&str>,
    rhs_dims: &Dimensions,
    rhs_raw: Raw<'_>,
) -> bool {
    lhs_unit == rhs_unit
        && lhs_name == rhs_name
        && lhs_dims.is_permutation_of(rhs_dims)
        && storage::equals_under(lhs_raw, rhs_raw)
}
