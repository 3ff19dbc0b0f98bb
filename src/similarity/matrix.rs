//! Dense pairwise cosine-similarity matrix.
//!
//! Rows are L2-normalized and multiplied against their transpose through
//! inverted postings, so each cell only touches the terms two books share.
//! Cells are accumulated in ascending term order from both sides, which keeps
//! the matrix exactly symmetric.

use rayon::prelude::*;

use super::vectorizer::TermVector;

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn from_vectors(vectors: &[TermVector], vocabulary_size: usize) -> Self {
        let n = vectors.len();

        let normalized: Vec<Vec<(usize, f32)>> = vectors.iter().map(l2_normalize).collect();

        // term -> (row, weight), rows ascending
        let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); vocabulary_size];
        for (row, entries) in normalized.iter().enumerate() {
            for &(term, weight) in entries {
                postings[term].push((row, weight));
            }
        }

        let mut values = vec![0.0f32; n * n];
        if n > 0 {
            values
                .par_chunks_mut(n)
                .enumerate()
                .for_each(|(i, row)| {
                    let entries = &normalized[i];
                    for &(term, weight) in entries {
                        for &(j, other) in &postings[term] {
                            row[j] += weight * other;
                        }
                    }
                    for cell in row.iter_mut() {
                        *cell = cell.clamp(0.0, 1.0);
                    }
                    if !entries.is_empty() {
                        row[i] = 1.0;
                    }
                });
        }

        Self { n, values }
    }

    /// Number of rows (and columns).
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.n
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[allow(dead_code)]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}

fn l2_normalize(vector: &TermVector) -> Vec<(usize, f32)> {
    let norm = vector
        .entries()
        .iter()
        .map(|&(_, count)| (count as f32) * (count as f32))
        .sum::<f32>()
        .sqrt();
    if norm < f32::EPSILON {
        return Vec::new();
    }
    vector
        .entries()
        .iter()
        .map(|&(term, count)| (term, count as f32 / norm))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::CountVectorizer;

    fn build(docs: &[&str]) -> SimilarityMatrix {
        let (vectorizer, vectors) = CountVectorizer::fit_transform(docs, 100);
        SimilarityMatrix::from_vectors(&vectors, vectorizer.vocabulary_size())
    }

    #[test]
    fn test_empty_corpus() {
        let matrix = SimilarityMatrix::from_vectors(&[], 0);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_unit_diagonal() {
        let matrix = build(&["dune spice", "spice worm", "emma austen"]);
        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let matrix = build(&[
            "dune frank herbert scienc fiction",
            "foundat isaac asimov scienc fiction",
            "emma jane austen romanc",
            "dune messiah frank herbert",
        ]);
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_known_cosine() {
        // [1, 1, 0] vs [0, 1, 1]: 1 / (sqrt2 * sqrt2) = 0.5
        let matrix = build(&["alpha beta", "beta gamma"]);
        assert!((matrix.get(0, 1) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_rows_are_zero() {
        let matrix = build(&["dune spice", "emma austen"]);
        assert_eq!(matrix.get(0, 1), 0.0);
    }

    #[test]
    fn test_zero_vector_row_is_all_zero() {
        let matrix = build(&["the and of", "dune spice"]);
        assert_eq!(matrix.row(0), &[0.0f32, 0.0]);
        assert_eq!(matrix.get(1, 0), 0.0);
        assert_eq!(matrix.get(1, 1), 1.0);
        assert!(matrix.row(0).iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_values_within_unit_range() {
        let matrix = build(&["dune dune spice", "dune spice spice", "spice"]);
        for i in 0..matrix.len() {
            for v in matrix.row(i) {
                assert!((0.0..=1.0).contains(v));
            }
        }
    }
}
