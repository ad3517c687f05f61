use ndarray::{Array1, Array2};

/// Scale every row of `matrix` to unit Euclidean length. All-zero rows are left as-is.
pub fn l2_normalize_rows(mut matrix: Array2<f64>) -> Array2<f64> {
    for mut row in matrix.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|value| value / norm);
        }
    }
    matrix
}

/// Scale a single vector to unit Euclidean length. A zero vector is returned unchanged.
pub fn l2_normalize(values: &[f64]) -> Array1<f64> {
    let mut vector = Array1::from(values.to_vec());
    let norm = vector.dot(&vector).sqrt();
    if norm > 0.0 {
        vector.mapv_inplace(|value| value / norm);
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rows_have_unit_length() {
        let normalized = l2_normalize_rows(array![[3.0, 4.0], [1.0, 1.0]]);
        assert!((normalized[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((normalized[[0, 1]] - 0.8).abs() < 1e-12);
        for row in normalized.rows() {
            assert!((row.dot(&row) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_row_is_unchanged() {
        let normalized = l2_normalize_rows(array![[0.0, 0.0], [0.0, 2.0]]);
        assert_eq!(normalized, array![[0.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn single_vector() {
        let v = l2_normalize(&[10.0, 50.0, 100.0, 1.0]);
        let norm = (10.0f64 * 10.0 + 2500.0 + 10000.0 + 1.0).sqrt();
        assert!((v[1] - 50.0 / norm).abs() < 1e-12);
        assert_eq!(l2_normalize(&[0.0, 0.0]).to_vec(), vec![0.0, 0.0]);
    }
}
