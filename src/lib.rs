//! Row-partitioned multi-threaded integer matrix multiplication.
//!
//! A fixed number of OS threads each own a contiguous block of output
//! rows. Every worker reads all of A and B and writes only its own rows
//! of C, so the computation needs no locks: disjoint row slices of C are
//! handed out with `split_at_mut` and the borrow checker does the rest.
//!
//! ## Usage
//!
//! ```
//! use rowmul::{Matrix, multiply_parallel};
//!
//! let a = Matrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
//! let b = Matrix::from_rows(&[vec![5, 6], vec![7, 8]]).unwrap();
//!
//! let c = multiply_parallel(&a, &b, 4).unwrap();
//! assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
//! ```
//!
//! For file-to-file runs with timing, drive a [`MultiplyEngine`] through
//! its states the way the `rowmul` binary does.
//!
//! ## Limitations
//!
//! - Square matrices only
//! - `i32` elements; multiply-accumulate wraps on overflow
//! - The last thread takes any leftover rows, so it can carry up to
//!   `threads - 1` more rows than the others

pub mod error;
pub mod generate;
pub mod io;
pub mod matrix;
pub mod threaded;

pub use error::{Error, ReadError, Result};
pub use matrix::naive_ijk::matmul_naive_ijk;
pub use matrix::{Element, Matrix, MatrixStore};
pub use threaded::engine::{EngineConfig, EngineState, MultiplyEngine};
pub use threaded::partition::{RowRange, partition, partition_all};

/// Matrix multiply on a single thread: returns A * B.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_square_pair(a, b)?;
    let mut c = Matrix::zeroed(a.dim())?;
    matmul_naive_ijk(a.as_slice(), b.as_slice(), c.as_mut_slice(), a.dim());
    Ok(c)
}

/// Same as [`multiply`] but splits the rows of the result over
/// `num_threads` worker threads.
///
/// The result does not depend on `num_threads`.
pub fn multiply_parallel(a: &Matrix, b: &Matrix, num_threads: usize) -> Result<Matrix> {
    check_square_pair(a, b)?;

    let mut engine = MultiplyEngine::new(EngineConfig::new(num_threads, a.dim())?);
    engine.allocate()?;
    engine.populate_with(a, b)?;
    engine.run()?;
    engine.into_result()
}

fn check_square_pair(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.dim() != b.dim() {
        return Err(Error::Usage(format!(
            "dimension mismatch: A is {}x{}, B is {}x{}",
            a.dim(),
            a.dim(),
            b.dim(),
            b.dim()
        )));
    }
    Ok(())
}
