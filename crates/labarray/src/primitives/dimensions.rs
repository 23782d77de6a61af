//! Dimension algebra: an ordered association of labels to extents.
//!
//! ## Purpose
//!
//! This module provides [`Dimensions`], the shape descriptor of every
//! Variable. It maps dimension labels to extents while preserving order:
//! the first label is the outermost axis, the last the innermost, and the
//! stride of a dense axis is the product of the extents of all later axes.
//!
//! ## Design notes
//!
//! * **Ordered**: Order is the memory layout; equality is order-sensitive
//!   (use `is_permutation_of` for order-insensitive comparison).
//! * **Sparse marker**: The final axis may be marked sparse (ragged,
//!   per-row extent); it carries no dense extent and contributes no factor
//!   to the volume.
//! * **Small**: Shapes have a handful of axes; plain vectors beat any
//!   fancier structure here.
//!
//! ## Invariants
//!
//! * Each label appears at most once.
//! * `Dim::Invalid` never appears.
//! * At most the last axis is sparse; `shape().len()` equals
//!   `labels().len()` minus one when sparse.
//!
//! ## Non-goals
//!
//! * This module does not validate slice descriptors (see the variable
//!   layer) and does not iterate buffers (see the view layer).

// External dependencies
use core::fmt::{Display, Formatter, Result as FmtResult};

// Internal dependencies
use crate::primitives::dim::Dim;
use crate::primitives::errors::ArrayError;

// ============================================================================
// Dimensions
// ============================================================================

/// An ordered `(label, extent)` sequence with an optional innermost sparse
/// marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dimensions {
    /// Axis labels, outermost first. When sparse, the last label has no
    /// entry in `shape`.
    labels: Vec<Dim>,

    /// Dense extents, aligned with the leading entries of `labels`.
    shape: Vec<usize>,

    /// Whether the final axis is sparse.
    sparse: bool,
}

impl Dimensions {
    /// Create an empty (rank-0) shape.
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            shape: Vec::new(),
            sparse: false,
        }
    }

    /// Create a dense shape from `(label, extent)` pairs, outermost first.
    pub fn from_pairs(pairs: &[(Dim, usize)]) -> Result<Self, ArrayError> {
        let mut dims = Self::new();
        for &(label, extent) in pairs {
            dims.add(label, extent)?;
        }
        Ok(dims)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of axes, including a sparse axis.
    #[inline]
    pub fn rank(&self) -> usize {
        self.labels.len()
    }

    /// True when there are no axes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All axis labels, outermost first.
    #[inline]
    pub fn labels(&self) -> &[Dim] {
        &self.labels
    }

    /// Dense axis labels (the sparse axis, if any, excluded).
    #[inline]
    pub fn dense_labels(&self) -> &[Dim] {
        &self.labels[..self.shape.len()]
    }

    /// Dense extents, aligned with `dense_labels`.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Whether the final axis is sparse.
    #[inline]
    pub fn sparse(&self) -> bool {
        self.sparse
    }

    /// The sparse axis label, if any.
    #[inline]
    pub fn sparse_dim(&self) -> Option<Dim> {
        if self.sparse {
            self.labels.last().copied()
        } else {
            None
        }
    }

    /// True when `dim` names any axis, dense or sparse.
    #[inline]
    pub fn contains(&self, dim: Dim) -> bool {
        self.labels.contains(&dim)
    }

    /// Position of `dim` among the labels.
    #[inline]
    pub fn index(&self, dim: Dim) -> Option<usize> {
        self.labels.iter().position(|&l| l == dim)
    }

    /// Extent of the dense axis `dim`; `None` when absent or sparse.
    #[inline]
    pub fn extent(&self, dim: Dim) -> Option<usize> {
        let i = self.index(dim)?;
        self.shape.get(i).copied()
    }

    /// Stride of the dense axis `dim`: the product of the extents of all
    /// later dense axes. For shapes with a sparse axis the stride counts
    /// rows, not elements. `None` when absent or sparse.
    #[inline]
    pub fn stride(&self, dim: Dim) -> Option<usize> {
        let i = self.index(dim)?;
        if i >= self.shape.len() {
            return None;
        }
        Some(self.shape[i + 1..].iter().product())
    }

    /// Product of the dense extents. For sparse shapes this is the outer
    /// row count; the sparse axis contributes no factor.
    #[inline]
    pub fn volume(&self) -> usize {
        self.shape.iter().product()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a dense axis as the new innermost dimension.
    pub fn add(&mut self, dim: Dim, extent: usize) -> Result<(), ArrayError> {
        if dim == Dim::Invalid {
            return Err(ArrayError::InvalidDimension);
        }
        if self.contains(dim) {
            return Err(ArrayError::DuplicateDimension { dim });
        }
        if self.sparse {
            // The sparse axis must stay innermost.
            return Err(ArrayError::UnexpectedSparseDimension { dims: self.clone() });
        }
        self.labels.push(dim);
        self.shape.push(extent);
        Ok(())
    }

    /// Append a sparse axis as the (final) innermost dimension.
    pub fn add_sparse(&mut self, dim: Dim) -> Result<(), ArrayError> {
        if dim == Dim::Invalid {
            return Err(ArrayError::InvalidDimension);
        }
        if self.contains(dim) {
            return Err(ArrayError::DuplicateDimension { dim });
        }
        if self.sparse {
            return Err(ArrayError::UnexpectedSparseDimension { dims: self.clone() });
        }
        self.labels.push(dim);
        self.sparse = true;
        Ok(())
    }

    /// Change the extent of the dense axis `dim`.
    pub fn resize(&mut self, dim: Dim, extent: usize) -> Result<(), ArrayError> {
        let i = self.index(dim).ok_or(ArrayError::DimensionNotFound {
            dim,
            dims: self.clone(),
        })?;
        if i >= self.shape.len() {
            return Err(ArrayError::UnexpectedSparseDimension { dims: self.clone() });
        }
        self.shape[i] = extent;
        Ok(())
    }

    /// Remove the axis `dim` (dense or sparse).
    pub fn erase(&mut self, dim: Dim) -> Result<(), ArrayError> {
        let i = self.index(dim).ok_or(ArrayError::DimensionNotFound {
            dim,
            dims: self.clone(),
        })?;
        if i >= self.shape.len() {
            self.sparse = false;
        } else {
            self.shape.remove(i);
        }
        self.labels.remove(i);
        Ok(())
    }

    /// Replace the label at position `index` with `dim`.
    pub fn relabel(&mut self, index: usize, dim: Dim) -> Result<(), ArrayError> {
        if dim == Dim::Invalid {
            return Err(ArrayError::InvalidDimension);
        }
        if index >= self.labels.len() {
            return Err(ArrayError::DimensionNotFound {
                dim,
                dims: self.clone(),
            });
        }
        if self.labels[index] != dim && self.contains(dim) {
            return Err(ArrayError::DuplicateDimension { dim });
        }
        self.labels[index] = dim;
        Ok(())
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// True when every axis of `other` is present here with the same
    /// extent (order-insensitive). A sparse `other` additionally requires
    /// the same sparse axis.
    pub fn contains_dims(&self, other: &Dimensions) -> bool {
        if other.sparse() && self.sparse_dim() != other.sparse_dim() {
            return false;
        }
        other
            .dense_labels()
            .iter()
            .all(|&l| self.extent(l) == other.extent(l))
    }

    /// True when `other` is a reordering of the same labels and extents.
    pub fn is_permutation_of(&self, other: &Dimensions) -> bool {
        self.rank() == other.rank()
            && self.sparse_dim() == other.sparse_dim()
            && self
                .dense_labels()
                .iter()
                .all(|&l| other.extent(l) == self.extent(l))
    }

    /// True iff this shape is a contiguous sub-block of `parent` under the
    /// same label order: all labels match positionally from the innermost
    /// side, all extents match except that the outermost axis may be a
    /// leading section of the parent's.
    pub fn is_contiguous_in(&self, parent: &Dimensions) -> bool {
        if self == parent {
            return true;
        }
        if self.sparse || parent.sparse {
            return false;
        }
        let count = self.rank();
        let parent_count = parent.rank();
        if parent_count < count {
            return false;
        }
        let offset = parent_count - count;
        for i in 0..count {
            if parent.labels[i + offset] != self.labels[i] {
                return false;
            }
            if i == 0 {
                if parent.shape[offset] < self.shape[0] {
                    return false;
                }
            } else if parent.shape[i + offset] != self.shape[i] {
                return false;
            }
        }
        true
    }

    /// The dense part of this shape (the sparse axis, if any, dropped).
    pub fn dense_subset(&self) -> Dimensions {
        Dimensions {
            labels: self.dense_labels().to_vec(),
            shape: self.shape.clone(),
            sparse: false,
        }
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{")?;
        for (i, &label) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.shape.get(i) {
                Some(extent) => write!(f, "{{{}, {}}}", label, extent)?,
                None => write!(f, "{{{}, sparse}}", label)?,
            }
        }
        write!(f, "}}")
    }
}
