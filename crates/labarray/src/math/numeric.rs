//! Numeric predicates and parameters for bin-edge arrays.
//!
//! These helpers classify coordinate arrays for the binning kernels: the
//! fused event-binning path only supports uniformly spaced edges, for which
//! the bin of a value is a single multiply-and-truncate.

// External dependencies
use num_traits::Float;

/// True when `values` is (approximately) uniformly spaced and increasing.
///
/// The tolerance scales with the spanned range so that accumulated rounding
/// in edge construction does not reject genuinely linear spacings.
pub fn is_linspace<T: Float>(values: &[T]) -> bool {
    let n = values.len();
    if n < 2 {
        return false;
    }
    let first = values[0];
    let last = values[n - 1];
    if last <= first {
        return false;
    }
    let step = (last - first) / T::from(n - 1).unwrap();
    let tolerance = (last - first).abs() * T::epsilon() * T::from(n).unwrap();
    values.iter().enumerate().all(|(i, &v)| {
        let expected = first + step * T::from(i).unwrap();
        (v - expected).abs() <= tolerance
    })
}

/// Parameters mapping a value onto a uniform bin grid.
///
/// Returns `(offset, nbin, scale)` such that the (real-valued) bin index of
/// `x` is `(x - offset) * scale`, with `nbin` the bin count as a float for
/// range comparison.
pub fn linear_edge_params<T: Float>(edges: &[T]) -> (T, T, T) {
    let offset = edges[0];
    let nbin = T::from(edges.len() - 1).unwrap();
    let scale = nbin / (edges[edges.len() - 1] - edges[0]);
    (offset, nbin, scale)
}
