//! Error types for labeled-array operations.
//!
//! ## Purpose
//!
//! This module defines the error conditions surfaced by the array engine:
//! dimension mismatches, unit mismatches, element-kind violations, invalid
//! slices, and unsupported sparse/dense combinations.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the actual and expected shapes, units, or
//!   kinds so callers can produce precise messages.
//! * **Fail-fast**: In-place operations surface these errors before any
//!   write; no partial mutation is observable.
//! * **Compile-time elimination**: Mutation through a const view and resize
//!   of a view are impossible by construction (views are borrows), so no
//!   runtime variants exist for them.
//!
//! ## Invariants
//!
//! * All variants provide sufficient context for diagnosis.
//! * Error messages are consistent in tone and formatting.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide error recovery or fallback strategies.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use std::error::Error;

// Internal dependencies
use crate::primitives::dim::Dim;
use crate::primitives::dimensions::Dimensions;
use crate::primitives::kind::ElementKind;
use crate::primitives::slicing::Slice;
use crate::primitives::unit::Unit;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for labeled-array operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// Operand shapes neither match nor contain one another.
    DimensionMismatch {
        /// The shape the operation expected.
        expected: Dimensions,
        /// The shape it received.
        actual: Dimensions,
    },

    /// A dimension label is not present in a shape.
    DimensionNotFound {
        /// The missing label.
        dim: Dim,
        /// The shape searched.
        dims: Dimensions,
    },

    /// A dimension is present but has the wrong extent.
    DimensionLength {
        /// The offending label.
        dim: Dim,
        /// The required extent.
        expected: usize,
        /// The extent found.
        actual: usize,
    },

    /// A label would appear twice in one shape.
    DuplicateDimension {
        /// The repeated label.
        dim: Dim,
    },

    /// The number of axes is wrong for the operation.
    RankMismatch {
        /// The required rank.
        expected: usize,
        /// The rank found.
        actual: usize,
    },

    /// A data buffer's length disagrees with the shape's volume.
    VolumeMismatch {
        /// Volume given by the dimension extents.
        expected: usize,
        /// Number of elements provided.
        actual: usize,
    },

    /// A sparse (event-list) shape was required.
    SparseDimensionRequired {
        /// The dense shape received.
        dims: Dimensions,
    },

    /// A dense shape was required.
    UnexpectedSparseDimension {
        /// The sparse shape received.
        dims: Dimensions,
    },

    /// `Dim::Invalid` was used as a dimension label.
    InvalidDimension,

    /// Operand units differ where equal units are required.
    UnitMismatch {
        /// The unit the operation expected.
        expected: Unit,
        /// The unit it received.
        actual: Unit,
    },

    /// A partial view tried to change its parent's unit.
    UnitChangeOnSlice {
        /// The unit the view tried to set.
        unit: Unit,
    },

    /// Operand element kinds differ.
    KindMismatch {
        /// The kind the operation expected.
        expected: ElementKind,
        /// The kind it received.
        actual: ElementKind,
    },

    /// Arithmetic was attempted on a non-arithmetic element kind.
    NotArithmetic {
        /// The offending kind.
        kind: ElementKind,
    },

    /// An operation does not support the given element kind.
    KindNotSupported {
        /// The operation name.
        operation: &'static str,
        /// The offending kind.
        kind: ElementKind,
    },

    /// A slice descriptor is out of range for a shape.
    SliceOutOfRange {
        /// The offending descriptor.
        slice: Slice,
        /// The shape sliced.
        dims: Dimensions,
    },

    /// The fused event-binning path requires uniformly spaced bin edges.
    NonUniformEdges,

    /// Bin edges must be strictly increasing.
    EdgesNotSorted {
        /// The axis the edges belong to.
        dim: Dim,
    },

    /// An unsupported combination of sparse and dense data.
    SparseUnsupported {
        /// The operation attempted.
        operation: &'static str,
    },

    /// Variable names differ where equal names are required.
    NameMismatch {
        /// The name the operation expected.
        expected: Option<String>,
        /// The name it received.
        actual: Option<String>,
    },

    /// Coordinates or labels of two datasets disagree.
    CoordMismatch {
        /// The offending coordinate or label name.
        name: String,
    },

    /// A dataset is missing an item required by the operation.
    ItemNotFound {
        /// The missing item's name.
        name: String,
    },
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for ArrayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "Expected dimensions {expected}, got {actual}")
            }
            Self::DimensionNotFound { dim, dims } => {
                write!(f, "Expected dimension to be in {dims}, got {dim}")
            }
            Self::DimensionLength {
                dim,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Dimension {dim} has extent {actual}, expected {expected}"
                )
            }
            Self::DuplicateDimension { dim } => {
                write!(f, "Duplicate dimension label {dim}")
            }
            Self::RankMismatch { expected, actual } => {
                write!(f, "Expected rank {expected}, got {actual}")
            }
            Self::VolumeMismatch { expected, actual } => {
                write!(
                    f,
                    "Data size {actual} does not match volume {expected} given by dimension extents"
                )
            }
            Self::SparseDimensionRequired { dims } => {
                write!(f, "Expected sparse dimensions, got {dims}")
            }
            Self::UnexpectedSparseDimension { dims } => {
                write!(f, "Expected non-sparse dimensions, got {dims}")
            }
            Self::InvalidDimension => {
                write!(f, "Invalid is not a valid dimension label")
            }
            Self::UnitMismatch { expected, actual } => {
                write!(f, "Expected unit {expected} to be equal to {actual}")
            }
            Self::UnitChangeOnSlice { unit } => {
                write!(
                    f,
                    "Partial view on data of variable cannot be used to change the unit (to {unit})"
                )
            }
            Self::KindMismatch { expected, actual } => {
                write!(
                    f,
                    "Underlying data types do not match: expected {expected}, got {actual}"
                )
            }
            Self::NotArithmetic { kind } => {
                write!(f, "Not an arithmetic type ({kind}), cannot apply operand")
            }
            Self::KindNotSupported { operation, kind } => {
                write!(f, "Cannot {operation} variable of type {kind}")
            }
            Self::SliceOutOfRange { slice, dims } => {
                write!(f, "Expected {slice} to be in {dims}")
            }
            Self::NonUniformEdges => {
                write!(f, "Non-constant bin width not supported yet")
            }
            Self::EdgesNotSorted { dim } => {
                write!(f, "Expected bin edges along {dim} to be strictly increasing")
            }
            Self::SparseUnsupported { operation } => {
                write!(
                    f,
                    "Unsupported combination of sparse and dense data in {operation}"
                )
            }
            Self::NameMismatch { expected, actual } => {
                write!(
                    f,
                    "Expected name '{}', got '{}'",
                    expected.as_deref().unwrap_or(""),
                    actual.as_deref().unwrap_or("")
                )
            }
            Self::CoordMismatch { name } => {
                write!(f, "Expected coordinates and labels to match ('{name}')")
            }
            Self::ItemNotFound { name } => {
                write!(f, "Dataset does not contain an item '{name}'")
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for ArrayError {}
