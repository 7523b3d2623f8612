//! In-place rectangular matrix transposition
//!
//! MAT-files store arrays column-major while hosts expect row-major tables.
//! The conversion runs in place by following the cycles of the transposition
//! permutation, so a matrix of any shape needs exactly one element of scratch.
//!
//! ```text
//! column-major 2x3:  [a00 a10 | a01 a11 | a02 a12]
//!                          transpose(buf, 2, 3)
//! row-major 2x3:     [a00 a01 a02 | a10 a11 a12]
//! ```
//!
//! `transpose(buf, rows, cols)` followed by `transpose(buf, cols, rows)`
//! restores the original buffer.

use crate::error::{MatError, Result};

/// Index whose element moves into position `i`
#[inline]
fn predecessor(i: usize, rows: usize, cols: usize) -> usize {
    rows * (i % cols) + i / cols
}

/// Transpose a `rows x cols` buffer stored first-index-fastest into
/// second-index-fastest order, in place.
///
/// # Panics
///
/// Panics if `buffer.len() != rows * cols`.
pub fn transpose<T: Copy>(buffer: &mut [T], rows: usize, cols: usize) {
    assert_eq!(
        buffer.len(),
        rows * cols,
        "buffer length does not match {}x{} matrix",
        rows,
        cols
    );

    let len = rows * cols;
    // First and last element never move; len <= 1 yields an empty range.
    for i in 1..len.saturating_sub(1) {
        let mut x = predecessor(i, rows, cols);
        // Fixed point, or cycle already rotated from a smaller start
        if x <= i {
            continue;
        }
        while x > i {
            x = predecessor(x, rows, cols);
        }
        if x < i {
            continue;
        }

        let tmp = buffer[i];
        let mut s = i;
        x = predecessor(i, rows, cols);
        while x != i {
            buffer[s] = buffer[x];
            s = x;
            x = predecessor(x, rows, cols);
        }
        buffer[s] = tmp;
    }
}

/// Checked variant of [`transpose`] that reports a length mismatch instead
/// of panicking.
pub fn try_transpose<T: Copy>(buffer: &mut [T], rows: usize, cols: usize) -> Result<()> {
    let expected = rows.checked_mul(cols).ok_or_else(|| {
        MatError::InvalidArgument(format!("{}x{} matrix size overflows", rows, cols))
    })?;
    if buffer.len() != expected {
        return Err(MatError::InvalidArgument(format!(
            "buffer holds {} elements, {}x{} matrix needs {}",
            buffer.len(),
            rows,
            cols,
            expected
        )));
    }
    transpose(buffer, rows, cols);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Out-of-place reference: column-major `rows x cols` to row-major
    fn reference(src: &[u32], rows: usize, cols: usize) -> Vec<u32> {
        let mut out = vec![0; src.len()];
        for r in 0..rows {
            for c in 0..cols {
                out[r * cols + c] = src[r + c * rows];
            }
        }
        out
    }

    #[test]
    fn test_two_by_three_to_column_major() {
        // Row-major 2x3 viewed as column-major 3x2 and transposed
        let mut buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        transpose(&mut buf, 3, 2);
        assert_eq!(buf, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_two_by_three_to_row_major() {
        let mut buf = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        transpose(&mut buf, 2, 3);
        assert_eq!(buf, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_degenerate_shapes_are_noops() {
        let mut empty: [f64; 0] = [];
        transpose(&mut empty, 0, 0);
        transpose(&mut empty, 0, 7);

        let mut single = [42.0];
        transpose(&mut single, 1, 1);
        assert_eq!(single, [42.0]);

        let mut row = [1, 2, 3, 4, 5];
        transpose(&mut row, 1, 5);
        assert_eq!(row, [1, 2, 3, 4, 5]);
        transpose(&mut row, 5, 1);
        assert_eq!(row, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_matches_reference_for_many_shapes() {
        for rows in 0..12 {
            for cols in 0..12 {
                let src: Vec<u32> = (0..(rows * cols) as u32).collect();
                let mut buf = src.clone();
                transpose(&mut buf, rows, cols);
                assert_eq!(buf, reference(&src, rows, cols), "shape {}x{}", rows, cols);
            }
        }
    }

    #[test]
    fn test_highly_non_square() {
        for (rows, cols) in [(1, 1000), (1000, 1), (2, 501), (997, 3)] {
            let src: Vec<u32> = (0..(rows * cols) as u32).collect();
            let mut buf = src.clone();
            transpose(&mut buf, rows, cols);
            assert_eq!(buf, reference(&src, rows, cols));
            transpose(&mut buf, cols, rows);
            assert_eq!(buf, src);
        }
    }

    #[test]
    fn test_bit_patterns_preserved() {
        let src = [f64::NAN, -0.0, f64::INFINITY, f64::MIN_POSITIVE, 1e-310, -1.5];
        let mut buf = src;
        transpose(&mut buf, 2, 3);
        transpose(&mut buf, 3, 2);
        for (a, b) in src.iter().zip(buf.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_try_transpose_rejects_length_mismatch() {
        let mut buf = [1.0, 2.0, 3.0];
        let err = try_transpose(&mut buf, 2, 2).unwrap_err();
        assert!(matches!(err, MatError::InvalidArgument(_)));
        assert_eq!(buf, [1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic]
    fn test_transpose_panics_on_length_mismatch() {
        let mut buf = [1.0, 2.0, 3.0];
        transpose(&mut buf, 2, 2);
    }
}
