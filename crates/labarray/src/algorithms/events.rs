//! Fused sparse/dense event arithmetic and event-list reshaping.
//!
//! ## Purpose
//!
//! Event data stores one resizable list of abscissas per outer row; every
//! event carries an implicit weight of one count. The fused kernels here
//! multiply or divide those implicit weights by the histogram bin each
//! event falls into, producing a sparse Variable of per-event weights.
//! `flatten` concatenates event lists across a dense axis.
//!
//! ## Design notes
//!
//! * **Uniform edges only**: The bin of an event is one multiply and
//!   truncate; non-uniform edges are a hard error pending requirements.
//! * **Out-of-range events**: These apply the operator against a zero
//!   weight (division yields an infinity, exactly as the dense analogue
//!   would).
//! * **Counts factor**: The result unit is `op(counts, weights.unit)`;
//!   callers divide the counts token back out when the operation should
//!   not introduce counts.
//! * **Row parallelism**: Rows write disjoint output lists and run in
//!   parallel; within a row, events stay in input order.
//!
//! ## Invariants
//!
//! * The sparse coordinate and the edges share a unit.
//! * The output row count equals the input row count, and each output
//!   row's length equals its input row's event count.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::parallel;
use crate::engine::validator::Validator;
use crate::math::numeric::{is_linspace, linear_edge_params};
use crate::primitives::{ArrayError, Dim, ElementKind, Unit};
use crate::storage::Element;
use crate::variable::Variable;
use crate::view::StridedLayout;

// ============================================================================
// Fused Multiply / Divide
// ============================================================================

/// Multiply the implicit unit weight of every event by the histogram bin
/// it falls into. The result unit carries a counts factor.
pub fn sparse_dense_multiply(
    sparse_coord: &Variable,
    edges: &Variable,
    weights: &Variable,
) -> Result<Variable, ArrayError> {
    sparse_dense_op(sparse_coord, edges, weights, true)
}

/// Divide the implicit unit weight of every event by the histogram bin it
/// falls into. The result unit carries a counts factor.
pub fn sparse_dense_divide(
    sparse_coord: &Variable,
    edges: &Variable,
    weights: &Variable,
) -> Result<Variable, ArrayError> {
    sparse_dense_op(sparse_coord, edges, weights, false)
}

fn sparse_dense_op(
    sparse_coord: &Variable,
    edges: &Variable,
    weights: &Variable,
    multiply: bool,
) -> Result<Variable, ArrayError> {
    match sparse_coord.kind() {
        ElementKind::SparseDouble => {
            sparse_dense_typed::<f64>(sparse_coord, edges, weights, multiply)
        }
        ElementKind::SparseFloat => {
            sparse_dense_typed::<f32>(sparse_coord, edges, weights, multiply)
        }
        kind => Err(ArrayError::KindNotSupported {
            operation: "bin events of",
            kind,
        }),
    }
}

fn sparse_dense_typed<T>(
    sparse_coord: &Variable,
    edges: &Variable,
    weights: &Variable,
    multiply: bool,
) -> Result<Variable, ArrayError>
where
    T: Float + Send + Sync + Element,
    Vec<T>: Element,
{
    let dim = Validator::require_sparse(sparse_coord.dims())?;
    Validator::unit_equals(sparse_coord.unit(), edges.unit())?;
    Validator::rank_equals(edges.dims(), 1)?;
    if edges.dims().labels()[0] != dim {
        return Err(ArrayError::DimensionNotFound {
            dim,
            dims: edges.dims().clone(),
        });
    }
    let edge_vals = edges.values::<T>()?;
    if edge_vals.len() < 2 {
        return Err(ArrayError::DimensionLength {
            dim,
            expected: 2,
            actual: edge_vals.len(),
        });
    }
    Validator::sorted_edges(edge_vals, dim)?;
    if !is_linspace(edge_vals) {
        return Err(ArrayError::NonUniformEdges);
    }
    let bins = edge_vals.len() - 1;

    // The bin axis must be the innermost axis of the weights, so each row
    // is one contiguous span; outer axes must match the event rows.
    Validator::not_sparse(weights.dims())?;
    if weights.dims().labels().last() != Some(&dim) {
        return Err(ArrayError::SparseUnsupported {
            operation: "bin events (weights layout)",
        });
    }
    Validator::dimension_matches(weights.dims(), dim, bins)?;
    let shared = weights.dims().rank() == 1;
    if !shared {
        let mut outer = weights.dims().clone();
        outer.erase(dim)?;
        Validator::dims_equal(&sparse_coord.dims().dense_subset(), &outer)?;
    }

    let rows = sparse_coord.sparse_values::<T>()?;
    let weight_vals = weights.values::<T>()?;
    let (offset, nbin, scale) = linear_edge_params(edge_vals);

    let mut out_rows: Vec<Vec<T>> = vec![Vec::new(); rows.len()];
    parallel::for_each_row(&mut out_rows, |row, out_row| {
        let row_weights = if shared {
            weight_vals
        } else {
            &weight_vals[row * bins..(row + 1) * bins]
        };
        let one = T::one();
        out_row.reserve(rows[row].len());
        for &event in &rows[row] {
            let bin = (event - offset) * scale;
            let weight = if bin >= T::zero() && bin < nbin {
                row_weights[bin.to_usize().unwrap_or(0)]
            } else {
                T::zero()
            };
            out_row.push(if multiply { one * weight } else { one / weight });
        }
    });

    let unit = if multiply {
        Unit::counts() * weights.unit()
    } else {
        Unit::counts() / weights.unit()
    };
    let mut out = Variable::new::<Vec<T>>(unit, sparse_coord.dims().clone(), out_rows)?;
    out.set_name(sparse_coord.name().map(String::from));
    Ok(out)
}

// ============================================================================
// Flatten
// ============================================================================

/// Concatenate event lists across the dense axis `dim`: the result drops
/// `dim` and each remaining row holds its source rows' events in axis
/// order.
pub fn flatten(var: &Variable, dim: Dim) -> Result<Variable, ArrayError> {
    match var.kind() {
        ElementKind::SparseDouble => flatten_typed::<f64>(var, dim),
        ElementKind::SparseFloat => flatten_typed::<f32>(var, dim),
        ElementKind::SparseInt64 => flatten_typed::<i64>(var, dim),
        kind => Err(ArrayError::KindNotSupported {
            operation: "flatten",
            kind,
        }),
    }
}

fn flatten_typed<T>(var: &Variable, dim: Dim) -> Result<Variable, ArrayError>
where
    T: Clone,
    Vec<T>: Element,
{
    Validator::require_sparse(var.dims())?;
    if !var.dims().dense_labels().contains(&dim) {
        return Err(ArrayError::DimensionNotFound {
            dim,
            dims: var.dims().clone(),
        });
    }
    let mut dims = var.dims().clone();
    dims.erase(dim)?;

    let in_dense = var.dims().dense_subset();
    let out_dense = dims.dense_subset();
    // Walking the input rows in order and projecting away `dim` yields
    // each row's output position; the erased axis broadcasts to stride 0.
    let layout = StridedLayout::new(&in_dense, &out_dense, &out_dense, 0)?;

    let rows = var.sparse_values::<T>()?;
    let mut out_rows: Vec<Vec<T>> = vec![Vec::new(); out_dense.volume()];
    for (row, target) in layout.offsets().enumerate() {
        out_rows[target].extend_from_slice(&rows[row]);
    }
    let mut out = Variable::new::<Vec<T>>(var.unit(), dims, out_rows)?;
    out.set_name(var.name().map(String::from));
    Ok(out)
}
