//! Pairwise cosine similarity over sparse matrix rows.
//!
//! Both engines precompute a full dense similarity matrix once per model
//! build and read it for every request afterwards. Construction is
//! parallelized across rows with rayon; correctness does not depend on it.

use rayon::prelude::*;
use sprs::CsMat;

/// Dense row×row cosine similarity matrix for a CSR matrix.
///
/// The result is symmetric with a 1.0 diagonal. A zero row has similarity
/// 0.0 to every other row (there is no direction to compare), but keeps the
/// 1.0 self-similarity on the diagonal.
pub(crate) fn pairwise_cosine(matrix: &CsMat<f64>) -> Vec<Vec<f64>> {
    let rows: Vec<_> = matrix.outer_iterator().collect();
    let norms: Vec<f64> = rows
        .iter()
        .map(|row| row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt())
        .collect();

    (0..rows.len())
        .into_par_iter()
        .map(|i| {
            (0..rows.len())
                .map(|j| {
                    if i == j {
                        1.0
                    } else if norms[i] == 0.0 || norms[j] == 0.0 {
                        0.0
                    } else {
                        rows[i].dot(&rows[j]) / (norms[i] * norms[j])
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    fn matrix_from_rows(rows: &[&[f64]]) -> CsMat<f64> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut triplets = TriMat::new((rows.len(), cols));
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    triplets.add_triplet(i, j, value);
                }
            }
        }
        triplets.to_csr()
    }

    #[test]
    fn test_diagonal_is_one() {
        let matrix = matrix_from_rows(&[&[1.0, 2.0], &[0.0, 0.0], &[3.0, 1.0]]);
        let similarity = pairwise_cosine(&matrix);

        for (i, row) in similarity.iter().enumerate() {
            assert!((row[i] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let matrix = matrix_from_rows(&[&[1.0, 0.0, 2.0], &[2.0, 1.0, 0.0], &[0.0, 3.0, 1.0]]);
        let similarity = pairwise_cosine(&matrix);

        for i in 0..3 {
            for j in 0..3 {
                assert!((similarity[i][j] - similarity[j][i]).abs() < 1e-9);
                assert!(similarity[i][j] >= -1.0 - 1e-9);
                assert!(similarity[i][j] <= 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_parallel_vectors_score_one() {
        let matrix = matrix_from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let similarity = pairwise_cosine(&matrix);

        assert!((similarity[0][1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_row_scores_zero_against_others() {
        let matrix = matrix_from_rows(&[&[1.0, 2.0], &[0.0, 0.0]]);
        let similarity = pairwise_cosine(&matrix);

        assert_eq!(similarity[0][1], 0.0);
        assert_eq!(similarity[1][0], 0.0);
        assert_eq!(similarity[1][1], 1.0);
    }
}
