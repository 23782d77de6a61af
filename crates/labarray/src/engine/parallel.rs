//! Bounded row parallelism with a sequential fallback.
//!
//! The two row-partitioned kernels (rebin along the innermost axis and
//! event binning) run their rows through these helpers. With the
//! `parallel` feature the rows are distributed across CPU cores via
//! rayon; without it the identical loops run sequentially. Rows map to
//! disjoint output regions, so both forms compute the same result.

// Feature-gated imports
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `f` to each `chunk`-sized block of `data`, indexed by block.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_chunk<T, F>(data: &mut [T], chunk: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    data.par_chunks_mut(chunk)
        .enumerate()
        .for_each(|(index, block)| f(index, block));
}

/// Apply `f` to each `chunk`-sized block of `data`, indexed by block.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_chunk<T, F>(data: &mut [T], chunk: usize, f: F)
where
    F: Fn(usize, &mut [T]),
{
    for (index, block) in data.chunks_mut(chunk).enumerate() {
        f(index, block);
    }
}

/// Apply `f` to each element of `rows`, indexed by position.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_row<T, F>(rows: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Sync,
{
    rows.par_iter_mut()
        .enumerate()
        .for_each(|(index, row)| f(index, row));
}

/// Apply `f` to each element of `rows`, indexed by position.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_row<T, F>(rows: &mut [T], f: F)
where
    F: Fn(usize, &mut T),
{
    for (index, row) in rows.iter_mut().enumerate() {
        f(index, row);
    }
}
