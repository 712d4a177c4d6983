//! Error types for rowmul operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::threaded::engine::EngineState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("failed to allocate {n}x{n} matrix")]
    Allocation { n: usize },

    #[error("memory allocation for {num_threads} worker threads failed")]
    ThreadAllocation { num_threads: usize },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cannot write matrix to {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to spawn worker {index}: {source}")]
    Spawn { index: usize, source: io::Error },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("engine is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: EngineState,
        actual: EngineState,
    },
}

/// Failures while loading an operand matrix.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("{}: token {index} ({token:?}) is not an integer", path.display())]
    Malformed {
        path: PathBuf,
        index: usize,
        token: String,
    },

    #[error("{}: expected {expected} integers, found {found}", path.display())]
    Truncated {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}
