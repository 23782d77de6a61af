//! Pure numeric helpers.

pub mod numeric;

pub use numeric::{is_linspace, linear_edge_params};
