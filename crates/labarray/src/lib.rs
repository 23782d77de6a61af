//! # labarray — labeled multi-dimensional arrays
//!
//! A value-typed multi-dimensional array engine where axes are identified by
//! **named dimension labels** rather than by position. A [`Variable`] carries
//! a physical unit, an ordered set of labeled dimensions, and type-erased
//! storage over a closed set of element kinds. Binary arithmetic aligns
//! operands automatically over their labels: broadcasting, transposition,
//! and sub-block selection are all realized by one strided view layer.
//!
//! ## Quick Start
//!
//! ```rust
//! use labarray::prelude::*;
//!
//! // A 2 x 3 array of counts, labeled (Y, X), Y outermost.
//! let dims = Dimensions::from_pairs(&[(Dim::Y, 2), (Dim::X, 3)])?;
//! let a = Variable::new::<f64>(
//!     Unit::counts(),
//!     dims,
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//! )?;
//!
//! // A 1-D array over X broadcasts across Y on addition.
//! let b = Variable::new::<f64>(
//!     Unit::counts(),
//!     Dimensions::from_pairs(&[(Dim::X, 3)])?,
//!     vec![10.0, 20.0, 30.0],
//! )?;
//!
//! let c = (&a + &b)?;
//! assert_eq!(c.values::<f64>()?, &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
//! # Result::<(), ArrayError>::Ok(())
//! ```
//!
//! ## Histogram rebinning
//!
//! ```rust
//! use labarray::prelude::*;
//!
//! let edges = |v: Vec<f64>| {
//!     Variable::new::<f64>(
//!         Unit::m(),
//!         Dimensions::from_pairs(&[(Dim::X, v.len())]).unwrap(),
//!         v,
//!     )
//! };
//! let data = Variable::new::<f64>(
//!     Unit::counts(),
//!     Dimensions::from_pairs(&[(Dim::X, 4)])?,
//!     vec![1.0, 1.0, 1.0, 1.0],
//! )?;
//! let old = edges(vec![0.0, 1.0, 2.0, 3.0, 4.0])?;
//! let new = edges(vec![0.0, 2.0, 4.0])?;
//!
//! let rebinned = rebin(&data, Dim::X, &old, &new)?;
//! assert_eq!(rebinned.values::<f64>()?, &[2.0, 2.0]);
//! # Result::<(), ArrayError>::Ok(())
//! ```
//!
//! ## Errors
//!
//! Every operation returns `Result<_, ArrayError>`; errors carry the actual
//! and expected shapes, units, or element kinds. In-place operations fail
//! fast: no mutation is visible when a precondition check rejects the call.

// Layer 1: Primitives - dimension labels, dimension algebra, element kinds,
// units, slice descriptors, errors.
mod primitives;

// Layer 2: Math - pure numeric helpers.
mod math;

// Layer 3: View - the strided offset layout realizing broadcast, transpose,
// and sub-block traversal.
mod view;

// Layer 4: Storage - type-erased, copy-on-write buffers over the closed
// element-kind set.
mod storage;

// Layer 5: Variable - the user-facing value and its borrowed slice views.
mod variable;

// Layer 6: Engine - fail-fast validation, the elementwise transform engine,
// and the bounded row-parallel helpers.
mod engine;

// Layer 7: Algorithms - shape operations, histogram rebinning, event
// arithmetic, and elementwise math.
mod algorithms;

// Layer 8: Dataset - role-keyed aggregation of Variables.
mod dataset;

// Standard labarray prelude.
pub mod prelude {
    pub use crate::algorithms::{
        abs, broadcast, concatenate, copy, dot, filter, flatten, mean, norm, permute, rebin,
        reciprocal, replace_nan, resize, reverse, split, sparse_dense_divide,
        sparse_dense_multiply, sqrt, sum, swap,
    };
    pub use crate::dataset::{Dataset, Role};
    pub use crate::primitives::{ArrayError, Dim, Dimensions, ElementKind, Slice, Unit};
    pub use crate::storage::Element;
    pub use crate::variable::{Variable, VariableSlice, VariableSliceMut};
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing
// purposes. It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod view {
        pub use crate::view::*;
    }
    pub mod storage {
        pub use crate::storage::{Element, Storage};
    }
    pub mod variable {
        pub use crate::variable::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod dataset {
        pub use crate::dataset::*;
    }
}
