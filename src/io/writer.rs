use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Writes `matrix` to `path`, one integer per line in row-major order.
///
/// The file is created or truncated.
pub fn write_matrix(path: &Path, matrix: &Matrix) -> Result<()> {
    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut out = BufWriter::new(file);
    for value in matrix.as_slice() {
        writeln!(out, "{}", value).map_err(to_error)?;
    }
    out.flush().map_err(to_error)?;

    debug!(
        "wrote {}x{} matrix to {}",
        matrix.dim(),
        matrix.dim(),
        path.display()
    );
    Ok(())
}
