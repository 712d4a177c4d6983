use std::fs;
use std::path::Path;

use log::debug;

use crate::error::ReadError;
use crate::matrix::{Element, Matrix};

/// Fills `target` from the integers in the file at `path`.
///
/// Reads `target.dim()²` whitespace-separated integers in row-major order.
/// Anything after them is ignored.
pub fn load_matrix(path: &Path, target: &mut Matrix) -> Result<(), ReadError> {
    let text = fs::read_to_string(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    parse_into(&text, path, target.as_mut_slice())?;
    debug!(
        "loaded {}x{} matrix from {}",
        target.dim(),
        target.dim(),
        path.display()
    );
    Ok(())
}

/// Parses the first `out.len()` integers of `text` into `out`.
///
/// `path` only labels errors. Tokens past `out.len()` are never looked at,
/// so trailing garbage is harmless.
pub fn parse_into(text: &str, path: &Path, out: &mut [Element]) -> Result<(), ReadError> {
    let expected = out.len();
    let mut tokens = text.split_whitespace();

    for (index, slot) in out.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| ReadError::Truncated {
            path: path.to_path_buf(),
            expected,
            found: index,
        })?;
        *slot = token.parse().map_err(|_| ReadError::Malformed {
            path: path.to_path_buf(),
            index,
            token: token.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, len: usize) -> Result<Vec<Element>, ReadError> {
        let mut out = vec![0; len];
        parse_into(text, Path::new("test.txt"), &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_one_per_line() {
        assert_eq!(parse("1\n-2\n3\n4\n", 4).unwrap(), vec![1, -2, 3, 4]);
    }

    #[test]
    fn test_mixed_whitespace() {
        assert_eq!(parse("  1 2\t3\r\n\n4", 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        assert_eq!(parse("1 2 3 4 5 junk", 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_short_input() {
        match parse("1 2 3", 4) {
            Err(ReadError::Truncated {
                expected, found, ..
            }) => {
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("expected Truncated, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_token() {
        match parse("1 two 3 4", 4) {
            Err(ReadError::Malformed { index, token, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(token, "two");
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_is_malformed() {
        assert!(matches!(
            parse("99999999999", 1),
            Err(ReadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let mut m = Matrix::zeroed(2).unwrap();
        assert!(matches!(
            load_matrix(Path::new("/nonexistent/rowmul/m.txt"), &mut m),
            Err(ReadError::Open { .. })
        ));
    }
}
