//! Element-kind tags.
//!
//! Every storage buffer is tagged with the concrete element type it holds.
//! The set is closed: dispatch is a match on the tag, and a mismatched kind
//! is a miss in the match table rather than a failed downcast.

// External dependencies
use core::fmt::{Display, Formatter, Result};

/// The runtime tag identifying which concrete element type a Variable's
/// storage holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `f64` values.
    Double,
    /// `f32` values.
    Float,
    /// `i32` values.
    Int32,
    /// `i64` values.
    Int64,
    /// `bool` values (masks; combine with `|`).
    Bool,
    /// Owned strings.
    String,
    /// Fixed-length vectors of three doubles.
    Vector3,
    /// Nested datasets by value.
    Dataset,
    /// Per-row event lists of `f64`.
    SparseDouble,
    /// Per-row event lists of `f32`.
    SparseFloat,
    /// Per-row event lists of `i64`.
    SparseInt64,
}

impl ElementKind {
    /// Human-readable tag name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Double => "double",
            ElementKind::Float => "float",
            ElementKind::Int32 => "int32",
            ElementKind::Int64 => "int64",
            ElementKind::Bool => "bool",
            ElementKind::String => "string",
            ElementKind::Vector3 => "vector3d",
            ElementKind::Dataset => "Dataset",
            ElementKind::SparseDouble => "sparse_double",
            ElementKind::SparseFloat => "sparse_float",
            ElementKind::SparseInt64 => "sparse_int64",
        }
    }

    /// True for the numeric scalar kinds that admit `+ - * /`.
    #[inline]
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            ElementKind::Double | ElementKind::Float | ElementKind::Int32 | ElementKind::Int64
        )
    }

    /// True for the per-row event list kinds.
    #[inline]
    pub fn is_sparse(&self) -> bool {
        matches!(
            self,
            ElementKind::SparseDouble | ElementKind::SparseFloat | ElementKind::SparseInt64
        )
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name())
    }
}
