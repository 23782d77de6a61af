//! Input validation for array operations.
//!
//! ## Purpose
//!
//! This module centralizes the precondition checks the higher layers run
//! before touching any data: unit equality, dimension containment,
//! element-kind agreement, and edge-array ordering.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first violation; callers check
//!   everything before the first write, so failed operations mutate
//!   nothing.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//!
//! ## Non-goals
//!
//! * This module does not transform or repair inputs.
//! * This module does not perform the operations themselves.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::{ArrayError, Dim, Dimensions, ElementKind, Unit};

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for array operations.
///
/// Provides static methods returning `Result<(), ArrayError>` that fail
/// fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    /// Require two units to be equal.
    pub fn unit_equals(expected: Unit, actual: Unit) -> Result<(), ArrayError> {
        if expected != actual {
            return Err(ArrayError::UnitMismatch { expected, actual });
        }
        Ok(())
    }

    /// Require two shapes to be equal, including order.
    pub fn dims_equal(expected: &Dimensions, actual: &Dimensions) -> Result<(), ArrayError> {
        if expected != actual {
            return Err(ArrayError::DimensionMismatch {
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
        Ok(())
    }

    /// Require `outer` to contain every axis of `inner` with equal extent.
    pub fn dims_contains(outer: &Dimensions, inner: &Dimensions) -> Result<(), ArrayError> {
        if !outer.contains_dims(inner) {
            return Err(ArrayError::DimensionMismatch {
                expected: outer.clone(),
                actual: inner.clone(),
            });
        }
        Ok(())
    }

    /// Require the axis `dim` of `dims` to have the given extent.
    pub fn dimension_matches(
        dims: &Dimensions,
        dim: Dim,
        extent: usize,
    ) -> Result<(), ArrayError> {
        match dims.extent(dim) {
            Some(actual) if actual == extent => Ok(()),
            Some(actual) => Err(ArrayError::DimensionLength {
                dim,
                expected: extent,
                actual,
            }),
            None => Err(ArrayError::DimensionNotFound {
                dim,
                dims: dims.clone(),
            }),
        }
    }

    /// Require two element kinds to be equal.
    pub fn kind_equals(expected: ElementKind, actual: ElementKind) -> Result<(), ArrayError> {
        if expected != actual {
            return Err(ArrayError::KindMismatch { expected, actual });
        }
        Ok(())
    }

    /// Require an arithmetic element kind.
    pub fn arithmetic_kind(kind: ElementKind) -> Result<(), ArrayError> {
        if !kind.is_arithmetic() {
            return Err(ArrayError::NotArithmetic { kind });
        }
        Ok(())
    }

    /// Require a shape without a sparse axis.
    pub fn not_sparse(dims: &Dimensions) -> Result<(), ArrayError> {
        if dims.sparse() {
            return Err(ArrayError::UnexpectedSparseDimension { dims: dims.clone() });
        }
        Ok(())
    }

    /// Require a shape with a sparse axis, returning its label.
    pub fn require_sparse(dims: &Dimensions) -> Result<Dim, ArrayError> {
        dims.sparse_dim()
            .ok_or(ArrayError::SparseDimensionRequired { dims: dims.clone() })
    }

    /// Require a usable (non-`Invalid`) dimension label.
    pub fn valid_dim(dim: Dim) -> Result<(), ArrayError> {
        if dim == Dim::Invalid {
            return Err(ArrayError::InvalidDimension);
        }
        Ok(())
    }

    /// Require a shape of exactly `rank` axes.
    pub fn rank_equals(dims: &Dimensions, rank: usize) -> Result<(), ArrayError> {
        if dims.rank() != rank {
            return Err(ArrayError::RankMismatch {
                expected: rank,
                actual: dims.rank(),
            });
        }
        Ok(())
    }

    /// Require strictly increasing bin edges along `dim`.
    pub fn sorted_edges<T: Float>(edges: &[T], dim: Dim) -> Result<(), ArrayError> {
        if edges.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(ArrayError::EdgesNotSorted { dim });
        }
        Ok(())
    }
}
