//! Fork-join orchestration of a single multiply run.
//!
//! A run moves through `Idle → Allocated → Populated → Running → Joined →
//! Finalized`. Any failure after allocation releases the matrices and
//! leaves the engine `Finalized`.

use std::fmt;
use std::io;
use std::mem;
use std::path::Path;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::partition::partition;
use super::worker::WorkerTask;
use crate::error::{Error, Result};
use crate::io::{load_matrix, write_matrix};
use crate::matrix::{Element, Matrix, MatrixStore};

/// Thread count and matrix dimension for one run, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    num_threads: usize,
    n: usize,
}

impl EngineConfig {
    pub fn new(num_threads: usize, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::Usage("matrix size must be positive".into()));
        }
        if num_threads == 0 {
            return Err(Error::Usage("number of threads must be positive".into()));
        }
        Ok(Self { num_threads, n })
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Allocated,
    Populated,
    Running,
    Joined,
    Finalized,
}

/// Owns the buffers of one run and drives the workers over them.
///
/// ```
/// use rowmul::{EngineConfig, Matrix, MultiplyEngine};
///
/// let a = Matrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(&[vec![5, 6], vec![7, 8]]).unwrap();
///
/// let mut engine = MultiplyEngine::new(EngineConfig::new(2, 2).unwrap());
/// engine.allocate().unwrap();
/// engine.populate_with(&a, &b).unwrap();
/// engine.run().unwrap();
///
/// assert_eq!(engine.result().unwrap().as_slice(), &[19, 22, 43, 50]);
/// ```
pub struct MultiplyEngine {
    config: EngineConfig,
    state: EngineState,
    store: Option<MatrixStore>,
    spawn: SpawnFn,
}

/// Starts one worker thread inside the run's scope.
type SpawnFn = for<'scope, 'env> fn(
    &'scope Scope<'scope, 'env>,
    WorkerTask<'env>,
) -> io::Result<ScopedJoinHandle<'scope, ()>>;

impl fmt::Debug for MultiplyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiplyEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl MultiplyEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Idle,
            store: None,
            spawn: spawn_worker,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// `Idle → Allocated`.
    pub fn allocate(&mut self) -> Result<()> {
        self.expect(EngineState::Idle)?;
        match MatrixStore::allocate(self.config.n) {
            Ok(store) => {
                self.store = Some(store);
                self.transition(EngineState::Allocated);
                Ok(())
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// `Allocated → Populated`, loading A and B from whitespace-separated
    /// integer files.
    pub fn populate(&mut self, path_a: &Path, path_b: &Path) -> Result<()> {
        self.expect(EngineState::Allocated)?;
        let loaded = match self.store.as_mut() {
            Some(store) => load_matrix(path_a, &mut store.a)
                .and_then(|()| load_matrix(path_b, &mut store.b))
                .map_err(Error::from),
            None => Err(self.state_error(EngineState::Allocated)),
        };
        self.finish_populate(loaded)
    }

    /// `Allocated → Populated`, copying A and B from in-memory matrices.
    pub fn populate_with(&mut self, a: &Matrix, b: &Matrix) -> Result<()> {
        self.expect(EngineState::Allocated)?;
        let n = self.config.n;
        let copied = if a.dim() != n || b.dim() != n {
            Err(Error::Usage(format!(
                "operands are {}x{} and {}x{}, engine expects {n}x{n}",
                a.dim(),
                a.dim(),
                b.dim(),
                b.dim()
            )))
        } else {
            match self.store.as_mut() {
                Some(store) => {
                    store.a.as_mut_slice().copy_from_slice(a.as_slice());
                    store.b.as_mut_slice().copy_from_slice(b.as_slice());
                    Ok(())
                }
                None => Err(self.state_error(EngineState::Allocated)),
            }
        };
        self.finish_populate(copied)
    }

    /// `Populated → Running → Joined`.
    ///
    /// Starts the clock, spawns one worker per configured thread (including
    /// workers whose range is empty), joins all of them and returns the
    /// wall-clock time between the first spawn and the last join.
    pub fn run(&mut self) -> Result<Duration> {
        self.expect(EngineState::Populated)?;
        self.transition(EngineState::Running);

        let num_threads = self.config.num_threads;
        let spawn = self.spawn;
        let outcome = match self.store.as_mut() {
            Some(MatrixStore { a, b, c }) => {
                let start = Instant::now();
                execute(a, b, c, num_threads, spawn).map(|()| start.elapsed())
            }
            None => Err(self.state_error(EngineState::Running)),
        };

        match outcome {
            Ok(elapsed) => {
                self.transition(EngineState::Joined);
                debug!(
                    "{} workers joined after {:.6}s",
                    num_threads,
                    elapsed.as_secs_f64()
                );
                Ok(elapsed)
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// The product, readable only once every worker has joined.
    pub fn result(&self) -> Result<&Matrix> {
        self.expect(EngineState::Joined)?;
        self.store
            .as_ref()
            .map(|store| &store.c)
            .ok_or_else(|| self.state_error(EngineState::Joined))
    }

    /// `Joined → Finalized`: writes C to `path_c` and releases everything.
    ///
    /// Memory is released whether or not the write succeeds.
    pub fn finalize(mut self, path_c: &Path) -> Result<()> {
        self.expect(EngineState::Joined)?;
        let store = self
            .store
            .take()
            .ok_or_else(|| self.state_error(EngineState::Joined))?;

        let written = write_matrix(path_c, &store.c);
        if let Err(e) = &written {
            warn!("{}", e);
        }

        store.release();
        self.transition(EngineState::Finalized);
        written
    }

    /// `Joined → Finalized`: releases A and B and hands C to the caller.
    pub fn into_result(mut self) -> Result<Matrix> {
        self.expect(EngineState::Joined)?;
        let store = self
            .store
            .take()
            .ok_or_else(|| self.state_error(EngineState::Joined))?;
        self.transition(EngineState::Finalized);
        Ok(store.c)
    }

    fn finish_populate(&mut self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.transition(EngineState::Populated);
                Ok(())
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    fn expect(&self, expected: EngineState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.state_error(expected))
        }
    }

    fn state_error(&self, expected: EngineState) -> Error {
        Error::InvalidState {
            expected,
            actual: self.state,
        }
    }

    fn transition(&mut self, to: EngineState) {
        debug!("engine {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    /// Drops any allocated matrices and ends the run.
    fn abort(&mut self) {
        if let Some(store) = self.store.take() {
            store.release();
        }
        self.transition(EngineState::Finalized);
    }
}

fn spawn_worker<'scope, 'env>(
    s: &'scope Scope<'scope, 'env>,
    task: WorkerTask<'env>,
) -> io::Result<ScopedJoinHandle<'scope, ()>> {
    thread::Builder::new()
        .name(format!("rowmul-worker-{}", task.index))
        .spawn_scoped(s, move || task.run())
}

/// Room for `num_threads` join handles, failing instead of aborting when
/// the count is too large to track.
fn handle_slots<T>(num_threads: usize) -> Result<Vec<T>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(num_threads)
        .map_err(|_| Error::ThreadAllocation { num_threads })?;
    Ok(slots)
}

/// Spawns one scoped worker per thread and joins them all.
///
/// C is carved into disjoint row slices with `split_at_mut`, so no two
/// workers can touch the same cell and nothing reads C until every
/// handle is joined. Ranges are computed as workers are spawned; a spawn
/// failure stops spawning but every started worker is still joined.
fn execute(
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    num_threads: usize,
    spawn: SpawnFn,
) -> Result<()> {
    let n = a.dim();

    thread::scope(|s| {
        let mut handles = handle_slots(num_threads)?;
        let mut rest: &mut [Element] = c.as_mut_slice();
        let mut failure = None;

        for index in 0..num_threads {
            let range = partition(num_threads, n, index);
            let (c_rows, tail) = mem::take(&mut rest).split_at_mut(range.len() * n);
            rest = tail;

            let task = WorkerTask {
                index,
                range,
                a,
                b,
                c_rows,
            };
            match spawn(s, task) {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    failure = Some(Error::Spawn { index, source });
                    break;
                }
            }
        }

        // join everything that was started, even after a spawn failure
        for (index, handle) in handles {
            if handle.join().is_err() && failure.is_none() {
                failure = Some(Error::WorkerPanicked(index));
            }
        }

        failure.map_or(Ok(()), Err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn populated(num_threads: usize, a: &Matrix, b: &Matrix) -> MultiplyEngine {
        let mut engine = MultiplyEngine::new(EngineConfig::new(num_threads, a.dim()).unwrap());
        engine.allocate().unwrap();
        engine.populate_with(a, b).unwrap();
        engine
    }

    static SPAWN_FAIL_DONE: AtomicUsize = AtomicUsize::new(0);
    static PANIC_DONE: AtomicUsize = AtomicUsize::new(0);

    /// Spawns workers 0 and 1, refuses worker 2.
    fn spawn_two_then_fail<'scope, 'env>(
        s: &'scope Scope<'scope, 'env>,
        task: WorkerTask<'env>,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>> {
        if task.index >= 2 {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "no more threads"));
        }
        thread::Builder::new().spawn_scoped(s, move || {
            thread::sleep(Duration::from_millis(20));
            task.run();
            SPAWN_FAIL_DONE.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Worker 1 panics, the others finish normally.
    fn spawn_with_panic<'scope, 'env>(
        s: &'scope Scope<'scope, 'env>,
        task: WorkerTask<'env>,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>> {
        thread::Builder::new().spawn_scoped(s, move || {
            if task.index == 1 {
                panic!("worker 1 fault");
            }
            task.run();
            PANIC_DONE.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_spawn_failure_joins_started_workers_and_releases() {
        let a = Matrix::identity(4).unwrap();
        let mut engine = populated(4, &a, &a);
        engine.spawn = spawn_two_then_fail;

        let err = engine.run().unwrap_err();

        assert!(matches!(err, Error::Spawn { index: 2, .. }), "{:?}", err);
        assert_eq!(SPAWN_FAIL_DONE.load(Ordering::SeqCst), 2);
        assert_eq!(engine.state(), EngineState::Finalized);
        assert!(engine.store.is_none());
    }

    #[test]
    fn test_worker_panic_is_reported_and_releases() {
        let a = Matrix::identity(6).unwrap();
        let mut engine = populated(3, &a, &a);
        engine.spawn = spawn_with_panic;

        let err = engine.run().unwrap_err();

        assert!(matches!(err, Error::WorkerPanicked(1)), "{:?}", err);
        assert_eq!(PANIC_DONE.load(Ordering::SeqCst), 2);
        assert_eq!(engine.state(), EngineState::Finalized);
        assert!(engine.store.is_none());
    }

    #[test]
    fn test_untrackable_thread_count_is_allocation_error() {
        assert!(matches!(
            handle_slots::<[u8; 64]>(usize::MAX),
            Err(Error::ThreadAllocation {
                num_threads: usize::MAX
            })
        ));
        assert_eq!(handle_slots::<u64>(8).unwrap().capacity(), 8);
    }

    #[test]
    fn test_config_rejects_zero() {
        assert!(matches!(EngineConfig::new(0, 4), Err(Error::Usage(_))));
        assert!(matches!(EngineConfig::new(4, 0), Err(Error::Usage(_))));
        assert!(EngineConfig::new(1, 1).is_ok());
    }

    #[test]
    fn test_state_walk() {
        let a = Matrix::identity(3).unwrap();
        let mut engine = MultiplyEngine::new(EngineConfig::new(2, 3).unwrap());
        assert_eq!(engine.state(), EngineState::Idle);

        engine.allocate().unwrap();
        assert_eq!(engine.state(), EngineState::Allocated);

        engine.populate_with(&a, &a).unwrap();
        assert_eq!(engine.state(), EngineState::Populated);

        engine.run().unwrap();
        assert_eq!(engine.state(), EngineState::Joined);

        let c = engine.into_result().unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let mut engine = MultiplyEngine::new(EngineConfig::new(1, 2).unwrap());
        assert!(matches!(
            engine.run(),
            Err(Error::InvalidState {
                expected: EngineState::Populated,
                actual: EngineState::Idle
            })
        ));
        assert!(engine.result().is_err());

        engine.allocate().unwrap();
        assert!(engine.allocate().is_err());
        assert!(engine.result().is_err());
    }

    #[test]
    fn test_dimension_mismatch_releases_store() {
        let a = Matrix::identity(3).unwrap();
        let mut engine = MultiplyEngine::new(EngineConfig::new(1, 2).unwrap());
        engine.allocate().unwrap();

        assert!(matches!(engine.populate_with(&a, &a), Err(Error::Usage(_))));
        assert_eq!(engine.state(), EngineState::Finalized);
        assert!(engine.store.is_none());
    }

    #[test]
    fn test_missing_file_releases_store() {
        let mut engine = MultiplyEngine::new(EngineConfig::new(1, 2).unwrap());
        engine.allocate().unwrap();

        let missing = Path::new("/nonexistent/rowmul/a.txt");
        assert!(matches!(
            engine.populate(missing, missing),
            Err(Error::Read(_))
        ));
        assert_eq!(engine.state(), EngineState::Finalized);
        assert!(engine.store.is_none());
    }

    #[test]
    fn test_spawns_empty_range_workers() {
        let a = Matrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(&[vec![5, 6], vec![7, 8]]).unwrap();
        let mut engine = populated(8, &a, &b);

        engine.run().unwrap();

        assert_eq!(engine.result().unwrap().as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let n = 13;
        let a = Matrix::from_vec(n, (0..n * n).map(|i| (i % 11) as Element - 5).collect()).unwrap();
        let b = Matrix::from_vec(n, (0..n * n).map(|i| (i % 7) as Element - 3).collect()).unwrap();

        let mut expected = Matrix::zeroed(n).unwrap();
        crate::matrix::naive_ijk::matmul_naive_ijk(
            a.as_slice(),
            b.as_slice(),
            expected.as_mut_slice(),
            n,
        );

        for threads in [1, 2, 3, 4, 5, 13, 20] {
            let mut engine = populated(threads, &a, &b);
            engine.run().unwrap();
            assert_eq!(engine.into_result().unwrap(), expected, "threads={}", threads);
        }
    }
}
