//! Multi-threaded row-partitioned multiplication.
//!
//! Rows of C are split into contiguous ranges, one per thread. Each
//! worker reads all of A and B and writes only its own rows of C, so the
//! hot loop needs no locks.
//!
//! - `partition`: pure row-range assignment
//! - `worker`: the per-thread multiply over one range
//! - `engine`: allocation, spawn, join and timing for a whole run

pub mod engine;
pub mod partition;
pub mod worker;
