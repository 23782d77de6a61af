//! Strided traversal of flat buffers.

pub mod strided;

pub use strided::{Offsets, StridedLayout};
