//! Property-based tests for the in-place transpose and the file round trip

use extern_data::{transpose, try_transpose, MatFile};
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    #[test]
    fn prop_transpose_involution(
        rows in 0usize..40,
        cols in 0usize..40,
        seed in any::<u64>()
    ) {
        let original: Vec<u64> = (0..rows * cols)
            .map(|i| seed.wrapping_mul(i as u64 + 1))
            .collect();
        let mut buffer = original.clone();

        transpose(&mut buffer, rows, cols);
        transpose(&mut buffer, cols, rows);

        prop_assert_eq!(buffer, original);
    }

    #[test]
    fn prop_transpose_places_every_element(rows in 1usize..30, cols in 1usize..30) {
        let mut buffer: Vec<usize> = (0..rows * cols).collect();
        transpose(&mut buffer, rows, cols);

        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(buffer[r * cols + c], c * rows + r);
            }
        }
    }

    #[test]
    fn prop_try_transpose_rejects_wrong_length(
        rows in 1usize..20,
        cols in 1usize..20,
        extra in 1usize..5
    ) {
        let mut buffer = vec![0.0f64; rows * cols + extra];
        prop_assert!(try_transpose(&mut buffer, rows, cols).is_err());
        prop_assert!(buffer.iter().all(|&v| v == 0.0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_file_round_trip(
        rows in 1usize..12,
        cols in 1usize..12,
        values in proptest::collection::vec(any::<f64>(), 144)
    ) {
        let dir = TempDir::new().unwrap();
        let mat = MatFile::new(dir.path().join("prop.mat"));
        let data = &values[..rows * cols];

        mat.write_matrix("m", data, rows, cols, false).unwrap();
        prop_assert_eq!(mat.matrix_dimensions("m").unwrap(), (rows, cols));

        let back = mat.read_matrix("m", rows, cols).unwrap();
        let same_bits = data.iter().zip(&back).all(|(a, b)| a.to_bits() == b.to_bits());
        prop_assert!(same_bits);
    }
}
