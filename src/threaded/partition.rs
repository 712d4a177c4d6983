//! Static row assignment for the worker threads.

use std::ops::Range;

/// A half-open range `[start, end)` of row indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Rows assigned to thread `thread_index` out of `thread_count`.
///
/// Every thread gets `n / thread_count` rows except the last, which also
/// takes the remainder. With more threads than rows, every thread but the
/// last gets an empty range.
///
/// # Panics
///
/// Panics if `thread_count` is zero or `thread_index >= thread_count`.
pub fn partition(thread_count: usize, n: usize, thread_index: usize) -> RowRange {
    assert!(thread_count >= 1, "thread_count must be at least 1");
    assert!(
        thread_index < thread_count,
        "thread_index {} out of range for {} threads",
        thread_index,
        thread_count
    );

    let rows_per_thread = n / thread_count;
    let start = thread_index * rows_per_thread;
    let end = if thread_index == thread_count - 1 {
        n
    } else {
        start + rows_per_thread
    };

    RowRange { start, end }
}

/// All ranges for `thread_count` threads, in thread order.
pub fn partition_all(thread_count: usize, n: usize) -> Vec<RowRange> {
    (0..thread_count)
        .map(|tid| partition(thread_count, n, tid))
        .collect()
}
