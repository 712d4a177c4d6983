use super::Element;

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop: every `C[i][j]` is the dot product of
/// row `i` of A with column `j` of B. Multiply-accumulate wraps on
/// overflow, same as the threaded workers, so both produce identical bits.
///
/// Use this as a correctness baseline, not for performance.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Matrix C (n × n), row-major, overwritten (C = A * B)
/// * `n` - Dimension of all three matrices
///
/// # Panics
///
/// Panics if any slice is not exactly n² long.
pub fn matmul_naive_ijk(a: &[Element], b: &[Element], c: &mut [Element], n: usize) {
    assert_eq!(a.len(), n * n, "A: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(b.len(), n * n, "B: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(c.len(), n * n, "C: expected {}x{}={} elements", n, n, n * n);

    for i in 0..n {
        for j in 0..n {
            let mut sum: Element = 0;
            for p in 0..n {
                sum = sum.wrapping_add(a[i * n + p].wrapping_mul(b[p * n + j]));
            }
            c[i * n + j] = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_2x2() {
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut c = [0; 4];

        matmul_naive_ijk(&a, &b, &mut c, 2);

        assert_eq!(c, [19, 22, 43, 50]);
    }

    #[test]
    fn test_naive_overwrites() {
        let a = [2];
        let b = [3];
        let mut c = [100];

        matmul_naive_ijk(&a, &b, &mut c, 1);

        assert_eq!(c, [6]);
    }

    #[test]
    fn test_naive_wraps_on_overflow() {
        let a = [Element::MAX, 1, 0, 0];
        let b = [2, 0, 0, 0];
        let mut c = [0; 4];

        matmul_naive_ijk(&a, &b, &mut c, 2);

        assert_eq!(c[0], Element::MAX.wrapping_mul(2));
    }
}
