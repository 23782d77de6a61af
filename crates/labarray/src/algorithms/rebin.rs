//! Histogram rebinning.
//!
//! ## Purpose
//!
//! Redistribute per-bin quantities from one bin-edge set to another by
//! area overlap: each output bin accumulates, from every overlapping
//! input bin, the input value scaled by the overlapping fraction of the
//! input bin's width. Rebinning with the input's own edges is the
//! identity, and any output edge set covering the input range preserves
//! the total.
//!
//! ## Design notes
//!
//! * **Two-cursor sweep**: Input and output cursors advance by whichever
//!   high edge comes first; every bin pair is visited at most once, so a
//!   row costs O(N + M).
//! * **Row parallelism**: When the rebinned axis is innermost, each outer
//!   row is an independent stride-1 sweep over a disjoint output block;
//!   the rows run in parallel. Any other axis position takes the strided
//!   sequential path with identical per-row arithmetic.
//! * **Determinism**: Accumulation order within a row is input-index
//!   order, so floating-point results are reproducible.
//!
//! ## Invariants
//!
//! * Edges are strictly increasing, with one more edge than bins.
//! * The output is zero-initialized before any accumulation.
//!
//! ## Non-goals
//!
//! * Rebinning of non-float kinds (the overlap fraction has no integer
//!   meaning) and of event lists; both error.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::parallel;
use crate::engine::validator::Validator;
use crate::primitives::{ArrayError, Dim, ElementKind};
use crate::storage::Element;
use crate::variable::Variable;
use crate::view::StridedLayout;

// ============================================================================
// Entry Point
// ============================================================================

/// Rebin `var` along `dim` from the bin edges `old_coord` onto the bin
/// edges `new_coord`.
///
/// Both coordinates are 1-D over `dim` and of the same element kind as
/// the data; `old_coord` has one edge more than `var`'s extent along
/// `dim`. The result has `new_coord`'s bin count along `dim` and keeps
/// the unit.
pub fn rebin(
    var: &Variable,
    dim: Dim,
    old_coord: &Variable,
    new_coord: &Variable,
) -> Result<Variable, ArrayError> {
    Validator::not_sparse(var.dims())?;
    match var.kind() {
        ElementKind::Double => rebin_typed::<f64>(var, dim, old_coord, new_coord),
        ElementKind::Float => rebin_typed::<f32>(var, dim, old_coord, new_coord),
        kind => Err(ArrayError::KindNotSupported {
            operation: "rebin",
            kind,
        }),
    }
}

fn rebin_typed<T>(
    var: &Variable,
    dim: Dim,
    old_coord: &Variable,
    new_coord: &Variable,
) -> Result<Variable, ArrayError>
where
    T: Element + Float + Send + Sync,
{
    for coord in [old_coord, new_coord] {
        Validator::rank_equals(coord.dims(), 1)?;
        if coord.dims().labels()[0] != dim {
            return Err(ArrayError::DimensionNotFound {
                dim,
                dims: coord.dims().clone(),
            });
        }
    }

    let old_edges = old_coord.values::<T>()?;
    let new_edges = new_coord.values::<T>()?;
    Validator::sorted_edges(old_edges, dim)?;
    Validator::sorted_edges(new_edges, dim)?;

    let n_old = var.dims().extent(dim).ok_or(ArrayError::DimensionNotFound {
        dim,
        dims: var.dims().clone(),
    })?;
    if old_edges.len() != n_old + 1 {
        return Err(ArrayError::DimensionLength {
            dim,
            expected: n_old + 1,
            actual: old_edges.len(),
        });
    }
    if new_edges.len() < 2 {
        return Err(ArrayError::DimensionLength {
            dim,
            expected: 2,
            actual: new_edges.len(),
        });
    }
    let n_new = new_edges.len() - 1;

    let mut dims = var.dims().clone();
    dims.resize(dim, n_new)?;
    let mut out = var.make_default_from(dims);
    let old_vals = var.values::<T>()?;

    if var.dims().labels().last() == Some(&dim) {
        // Innermost axis: contiguous rows, processed in parallel.
        let new_vals = out.values_mut::<T>()?;
        parallel::for_each_chunk(new_vals, n_new, |row, new_row| {
            let old_row = &old_vals[row * n_old..(row + 1) * n_old];
            sweep(old_row, new_row, old_edges, new_edges);
        });
    } else {
        // Any other axis: one strided sweep per row, sequential.
        let old_stride = var.dims().stride(dim).unwrap_or(1);
        let new_stride = out.dims().stride(dim).unwrap_or(1);
        let mut outer = var.dims().clone();
        outer.erase(dim)?;
        let old_rows: Vec<usize> =
            StridedLayout::new(&outer, var.dims(), var.dims(), 0)?.offsets().collect();
        let new_rows: Vec<usize> =
            StridedLayout::new(&outer, out.dims(), out.dims(), 0)?.offsets().collect();
        let new_vals = out.values_mut::<T>()?;
        for (&old_base, &new_base) in old_rows.iter().zip(&new_rows) {
            sweep_strided(
                old_vals, old_base, old_stride, n_old, new_vals, new_base, new_stride, n_new,
                old_edges, new_edges,
            );
        }
    }
    Ok(out)
}

// ============================================================================
// Sweep Kernels
// ============================================================================

// One row, stride-1 input and output.
fn sweep<T: Float>(old: &[T], new: &mut [T], old_edges: &[T], new_edges: &[T]) {
    let n_old = old.len();
    let n_new = new.len();
    let mut iold = 0;
    let mut inew = 0;
    while iold < n_old && inew < n_new {
        let xo_low = old_edges[iold];
        let xo_high = old_edges[iold + 1];
        let xn_low = new_edges[inew];
        let xn_high = new_edges[inew + 1];
        if xn_high <= xo_low {
            // No overlap, go to next output bin.
            inew += 1;
        } else if xo_high <= xn_low {
            // No overlap, go to next input bin.
            iold += 1;
        } else {
            // delta is the overlap of the bins on the x axis.
            let delta = xo_high.min(xn_high) - xo_low.max(xn_low);
            let owidth = xo_high - xo_low;
            new[inew] = new[inew] + old[iold] * delta / owidth;
            if xn_high > xo_high {
                iold += 1;
            } else {
                inew += 1;
            }
        }
    }
}

// One row with explicit bases and strides, for a non-innermost axis.
#[allow(clippy::too_many_arguments)]
fn sweep_strided<T: Float>(
    old: &[T],
    old_base: usize,
    old_stride: usize,
    n_old: usize,
    new: &mut [T],
    new_base: usize,
    new_stride: usize,
    n_new: usize,
    old_edges: &[T],
    new_edges: &[T],
) {
    let mut iold = 0;
    let mut inew = 0;
    while iold < n_old && inew < n_new {
        let xo_low = old_edges[iold];
        let xo_high = old_edges[iold + 1];
        let xn_low = new_edges[inew];
        let xn_high = new_edges[inew + 1];
        if xn_high <= xo_low {
            inew += 1;
        } else if xo_high <= xn_low {
            iold += 1;
        } else {
            let delta = xo_high.min(xn_high) - xo_low.max(xn_low);
            let owidth = xo_high - xo_low;
            let target = new_base + inew * new_stride;
            new[target] = new[target] + old[old_base + iold * old_stride] * delta / owidth;
            if xn_high > xo_high {
                iold += 1;
            } else {
                inew += 1;
            }
        }
    }
}
