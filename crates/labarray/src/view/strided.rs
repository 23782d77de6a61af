//! The strided offset layout.
//!
//! ## Purpose
//!
//! This module provides [`StridedLayout`], the single mechanism behind
//! every non-trivial traversal in the crate: it walks a flat buffer as if
//! it had the shape `target_dims`, given that the buffer is laid out as
//! `parent_dims` and that only `visible_dims` of it are in view. Four
//! transforms fall out of one stride table:
//!
//! * **Projection** — the target has fewer axes than the parent.
//! * **Broadcast** — a target axis absent from the visible dims gets
//!   stride 0, so the same source elements repeat.
//! * **Sub-block** — a target extent smaller than the visible extent walks
//!   a leading section (the base offset positions the start).
//! * **Reorder** — target axes in a different order than the parent's
//!   produce a transposing walk.
//!
//! ## Design notes
//!
//! * **Offsets, not references**: The layout yields flat element offsets.
//!   One layout type therefore serves const reads, mutable writes, and
//!   repeated-write accumulation without aliasing concerns; the caller
//!   indexes its own buffer.
//! * **Deterministic order**: Iteration is target-dims lexicographic,
//!   outermost axis slowest. Accumulating walks (stride-0 write axes) are
//!   thereby reproducible.
//! * **Constant-time position**: The current flat offset is maintained
//!   incrementally; `next` is a carry loop from the innermost axis.
//!
//! ## Invariants
//!
//! * `offsets()` yields exactly `target_dims.volume()` offsets.
//! * A non-broadcast axis never exceeds the visible extent (rejected at
//!   construction).
//!
//! ## Non-goals
//!
//! * This module does not own or type data; it only computes offsets.
//! * Sparse axes are not traversed here; callers pass dense shapes.

// Internal dependencies
use crate::primitives::dimensions::Dimensions;
use crate::primitives::errors::ArrayError;

// ============================================================================
// StridedLayout
// ============================================================================

/// A per-axis stride table over a flat buffer.
#[derive(Debug, Clone)]
pub struct StridedLayout {
    /// Flat offset of the first element.
    base: usize,

    /// Target extents, outermost first.
    extents: Vec<usize>,

    /// Per-axis strides; 0 encodes broadcasting.
    strides: Vec<usize>,

    /// Product of the extents.
    volume: usize,
}

impl StridedLayout {
    /// Build the stride table for walking `parent`-laid-out data restricted
    /// to `visible` as if it were shaped `target`, starting at `base`.
    ///
    /// Axes of `target` absent from `visible` broadcast with stride 0. A
    /// target axis present in `visible` must not exceed the visible extent.
    pub fn new(
        target: &Dimensions,
        visible: &Dimensions,
        parent: &Dimensions,
        base: usize,
    ) -> Result<Self, ArrayError> {
        let dense = target.dense_labels();
        let mut extents = Vec::with_capacity(dense.len());
        let mut strides = Vec::with_capacity(dense.len());
        for (i, &label) in dense.iter().enumerate() {
            let extent = target.shape()[i];
            let stride = match visible.extent(label) {
                Some(visible_extent) => {
                    if extent > visible_extent {
                        return Err(ArrayError::DimensionLength {
                            dim: label,
                            expected: visible_extent,
                            actual: extent,
                        });
                    }
                    parent.stride(label).ok_or(ArrayError::DimensionNotFound {
                        dim: label,
                        dims: parent.clone(),
                    })?
                }
                None => 0,
            };
            extents.push(extent);
            strides.push(stride);
        }
        let volume = extents.iter().product();
        Ok(Self {
            base,
            extents,
            strides,
            volume,
        })
    }

    /// Number of offsets the layout yields.
    #[inline]
    pub fn len(&self) -> usize {
        self.volume
    }

    /// True when the layout yields nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volume == 0
    }

    /// Flat offset of the first element.
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// True when the walk covers one contiguous range `[base, base + len)`.
    ///
    /// Holds exactly when every stride equals the canonical row-major
    /// stride of the target extents.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 1usize;
        for axis in (0..self.extents.len()).rev() {
            if self.strides[axis] != expected {
                return false;
            }
            expected *= self.extents[axis];
        }
        true
    }

    /// Iterate the flat offsets in target-dims lexicographic order.
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets {
            extents: &self.extents,
            strides: &self.strides,
            cursor: vec![0; self.extents.len()],
            offset: self.base,
            remaining: self.volume,
        }
    }
}

// ============================================================================
// Offsets Iterator
// ============================================================================

/// Iterator over the flat offsets of a [`StridedLayout`].
#[derive(Debug)]
pub struct Offsets<'a> {
    extents: &'a [usize],
    strides: &'a [usize],
    cursor: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.offset;
        self.remaining -= 1;
        // Advance from the innermost axis, carrying outward on wrap.
        for axis in (0..self.extents.len()).rev() {
            self.cursor[axis] += 1;
            self.offset += self.strides[axis];
            if self.cursor[axis] < self.extents[axis] {
                break;
            }
            self.offset -= self.strides[axis] * self.extents[axis];
            self.cursor[axis] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}
