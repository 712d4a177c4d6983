//! Plain-text matrix files.
//!
//! Both directions use the same format: n² integers in row-major order.
//! The loader accepts any whitespace between them; the writer emits one
//! per line.

pub mod loader;
pub mod writer;

pub use loader::{load_matrix, parse_into};
pub use writer::write_matrix;
