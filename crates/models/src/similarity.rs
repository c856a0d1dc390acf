//! Cosine similarity kernels.
//!
//! Both models boil down to "pairwise cosine over a set of row vectors";
//! this module holds the shared math. The pairwise computation is O(n²)
//! in the number of rows, so rows are processed in parallel with Rayon.

use rayon::prelude::*;

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector is zero; the weight and TF-IDF vectors
/// here are non-negative, so results land in [0, 1].
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = dot(a, a).sqrt();
    let norm_b = dot(b, b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

/// Full pairwise cosine similarity matrix over a set of rows.
///
/// The diagonal is pinned to exactly 1.0, which both matches the
/// self-similarity contract and avoids float drift for zero rows.
pub fn pairwise_cosine(rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n = rows.len();
    (0..n)
        .into_par_iter()
        .map(|i| {
            let mut row = vec![0.0f32; n];
            for j in 0..n {
                row[j] = if i == j {
                    1.0
                } else {
                    cosine(&rows[i], &rows[j])
                };
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn cosine_ignores_magnitude() {
        let a = vec![1.0, 1.0];
        let b = vec![10.0, 10.0];
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pairwise_matrix_is_symmetric_with_unit_diagonal() {
        let rows = vec![
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0], // zero row still gets a 1.0 diagonal
        ];
        let matrix = pairwise_cosine(&rows);

        for i in 0..rows.len() {
            assert_eq!(matrix[i][i], 1.0);
            for j in 0..rows.len() {
                assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-6);
                assert!((0.0..=1.0).contains(&matrix[i][j]));
            }
        }
    }
}
