//! Per-thread multiply over one row range.

use log::trace;

use super::partition::RowRange;
use crate::matrix::{Element, Matrix};

/// Everything one worker needs: its rows, read access to both operands
/// and exclusive access to its rows of C.
///
/// `c_rows` holds exactly `range.len()` rows of C; row `range.start` is
/// at offset 0.
pub struct WorkerTask<'a> {
    pub index: usize,
    pub range: RowRange,
    pub a: &'a Matrix,
    pub b: &'a Matrix,
    pub c_rows: &'a mut [Element],
}

impl WorkerTask<'_> {
    /// Computes `C[i][j] = Σ_k A[i][k] * B[k][j]` for every row `i` in the
    /// range and every column `j`. Overflow wraps.
    pub fn run(self) {
        let n = self.a.dim();
        let a = self.a.as_slice();
        let b = self.b.as_slice();
        debug_assert_eq!(self.c_rows.len(), self.range.len() * n);

        trace!(
            "worker {} computing rows {}..{}",
            self.index, self.range.start, self.range.end
        );

        for (local, i) in self.range.rows().enumerate() {
            let a_row = &a[i * n..(i + 1) * n];
            let c_row = &mut self.c_rows[local * n..(local + 1) * n];
            for (j, cell) in c_row.iter_mut().enumerate() {
                let mut sum: Element = 0;
                for (p, &a_ip) in a_row.iter().enumerate() {
                    sum = sum.wrapping_add(a_ip.wrapping_mul(b[p * n + j]));
                }
                *cell = sum;
            }
        }
    }
}
