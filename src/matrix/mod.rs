//! Square integer matrices and the buffers a run owns.
//!
//! Everything is stored row-major in one contiguous buffer per matrix.
//! `naive_ijk` is the single-threaded correctness baseline the threaded
//! engine is checked against.

pub mod naive_ijk;
pub mod store;

pub use store::{Matrix, MatrixStore};

/// Element type of every matrix. Arithmetic on it wraps on overflow.
pub type Element = i32;
