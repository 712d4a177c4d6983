//! Owned matrix buffers.

use std::alloc::{self, Layout};

use log::debug;

use super::Element;
use crate::error::{Error, Result};

/// An n×n integer matrix stored row-major in one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    n: usize,
    data: Vec<Element>,
}

impl Matrix {
    /// Allocates an n×n matrix filled with zeros.
    ///
    /// Fails with [`Error::Allocation`] if n² overflows `usize` or the
    /// allocator refuses the request.
    pub fn zeroed(n: usize) -> Result<Self> {
        let len = n.checked_mul(n).ok_or(Error::Allocation { n })?;
        let layout = Layout::array::<Element>(len).map_err(|_| Error::Allocation { n })?;

        if layout.size() == 0 {
            return Ok(Self { n, data: Vec::new() });
        }

        // SAFETY: `layout` has non-zero size. Pages stay untouched until
        // the first write.
        let ptr = unsafe { alloc::alloc_zeroed(layout) } as *mut Element;
        if ptr.is_null() {
            return Err(Error::Allocation { n });
        }
        // SAFETY: `ptr` comes from the global allocator with the layout of
        // `[Element; len]`, and all `len` elements are zero-initialized.
        let data = unsafe { Vec::from_raw_parts(ptr, len, len) };

        Ok(Self { n, data })
    }

    /// Wraps an existing row-major buffer of n² elements.
    pub fn from_vec(n: usize, data: Vec<Element>) -> Result<Self> {
        if Some(data.len()) != n.checked_mul(n) {
            return Err(Error::Usage(format!(
                "expected {} elements for a {n}x{n} matrix, got {}",
                n.saturating_mul(n),
                data.len()
            )));
        }
        Ok(Self { n, data })
    }

    /// Builds a matrix from nested rows. Every row must be as long as
    /// there are rows.
    pub fn from_rows(rows: &[Vec<Element>]) -> Result<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().position(|row| row.len() != n) {
            return Err(Error::Usage(format!(
                "row {bad} has {} elements, expected {n}",
                rows[bad].len()
            )));
        }
        Ok(Self {
            n,
            data: rows.concat(),
        })
    }

    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeroed(n)?;
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        Ok(m)
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> Element {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[Element] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Element]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.n.max(1))
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<Element> {
        self.data
    }
}

/// The three buffers of one run: operands A and B, result C.
///
/// All three share the same dimension for the lifetime of the store.
/// Memory is returned when the store is dropped, so every early return
/// releases whatever was allocated.
#[derive(Debug)]
pub struct MatrixStore {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
}

impl MatrixStore {
    /// Allocates A, B and C as n×n zero matrices.
    ///
    /// If B or C cannot be allocated, the matrices already allocated are
    /// dropped before the error is returned.
    pub fn allocate(n: usize) -> Result<Self> {
        let a = Matrix::zeroed(n)?;
        let b = Matrix::zeroed(n)?;
        let c = Matrix::zeroed(n)?;
        debug!("allocated 3 matrices of {}x{}", n, n);
        Ok(Self { a, b, c })
    }

    pub fn dim(&self) -> usize {
        self.a.dim()
    }

    /// Frees all three matrices.
    pub fn release(self) {
        debug!("releasing {}x{} matrices", self.dim(), self.dim());
        drop(self);
    }
}
