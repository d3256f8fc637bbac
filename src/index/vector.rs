//! Normalized vector search.
//!
//! Stored vectors are L2-normalized once at build time; queries are
//! normalized with the same function at search time, so inner product
//! equals cosine similarity on both sides. The search is an exact scan,
//! which is plenty for a corpus of tens of thousands of records.

/// Scale a vector to unit Euclidean length.
///
/// A zero vector is returned unchanged rather than producing NaNs.
pub fn l2_normalize(vector: &[f32]) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}

/// Inner product of two equal-length vectors.
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Top-k inner-product index over L2-normalized vectors.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build an index from raw vectors, normalizing each.
    pub fn build<'a, I>(vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        Self {
            vectors: vectors.into_iter().map(l2_normalize).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Return the positions and scores of the k nearest vectors by inner
    /// product, ordered by descending score.
    ///
    /// The query is normalized here with the same function used at build
    /// time; passing a raw (unnormalized) embedding is expected.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let query = l2_normalize(query);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, inner_product(&query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize_unit_length() {
        let v = l2_normalize(&[3.0, 4.0]);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let vectors: Vec<Vec<f32>> = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.7, 0.7, 0.0],
        ];
        let index = VectorIndex::build(vectors.iter().map(|v| v.as_slice()));

        let results = index.search(&[1.0, 0.1, 0.0], 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[1].0, 2);
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_search_truncates_to_available() {
        let vectors: Vec<Vec<f32>> = vec![vec![1.0, 0.0]];
        let index = VectorIndex::build(vectors.iter().map(|v| v.as_slice()));

        assert_eq!(index.search(&[1.0, 0.0], 5).len(), 1);
    }

    #[test]
    fn test_normalized_inner_product_matches_cosine() {
        // Cosine similarity on raw vectors must equal inner product on the
        // index's normalized copies, otherwise build/query normalization
        // has diverged and ranking is broken.
        let raw: Vec<Vec<f32>> = vec![
            vec![2.0, 5.0, 1.0],
            vec![0.3, 0.1, 0.9],
            vec![4.0, 4.0, 4.0],
        ];
        let query = vec![1.5, 0.5, 2.5];

        let index = VectorIndex::build(raw.iter().map(|v| v.as_slice()));
        let results = index.search(&query, raw.len());

        for (position, score) in results {
            let cosine = {
                let dot = inner_product(&query, &raw[position]);
                let nq: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();
                let nv: f32 = raw[position].iter().map(|x| x * x).sum::<f32>().sqrt();
                dot / (nq * nv)
            };
            assert!((score - cosine).abs() < 1e-5);
        }
    }
}
