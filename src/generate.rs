//! Random fixture matrices for trying out the engine.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use rand::Rng;

use crate::error::{Error, Result};
use crate::matrix::Element;

/// Smallest value the generator produces.
pub const MIN_VALUE: Element = -5;
/// Largest value the generator produces.
pub const MAX_VALUE: Element = 5;

/// n² values drawn uniformly from `[MIN_VALUE, MAX_VALUE]`.
pub fn generate_values<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Vec<Element>> {
    let len = n.checked_mul(n).ok_or(Error::Allocation { n })?;

    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { n })?;
    values.extend((0..len).map(|_| rng.gen_range(MIN_VALUE..=MAX_VALUE)));
    Ok(values)
}

/// Writes n² random values to `path`, one per line.
pub fn write_random_matrix<R: Rng + ?Sized>(path: &Path, n: usize, rng: &mut R) -> Result<()> {
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut out = BufWriter::new(file);
    for value in generate_values(n, rng)? {
        writeln!(out, "{}", value).map_err(to_error)?;
    }
    out.flush().map_err(to_error)?;

    debug!("generated {}x{} matrix at {}", n, n, path.display());
    Ok(())
}
