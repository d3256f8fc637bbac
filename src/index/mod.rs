//! The persisted embedding index.
//!
//! An [`EmbeddingRecord`] is one embedded transcript segment with its
//! provenance. A full record sequence plus the [`VectorIndex`] derived from
//! it forms an [`IndexSnapshot`]; position *i* in the vector index always
//! corresponds to record *i*, which is how search hits map back to text.
//! Snapshots are immutable: a rebuild produces a new one and swaps it into
//! the [`SnapshotHandle`] without disturbing in-flight readers.

pub mod builder;
mod store;
mod vector;

pub use builder::{BuildReport, IndexBuilder};
pub use store::{IndexStore, IndexedSource};
pub use vector::{inner_product, l2_normalize, VectorIndex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// One embedded transcript segment with its provenance.
///
/// Created once per segment and never mutated; the raw embedding is stored
/// as returned by the embedding service, normalization happens only inside
/// the derived [`VectorIndex`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Source (episode) identifier, exact-match key for deduplication.
    pub source_id: String,
    /// Human-readable episode title.
    pub source_title: String,
    /// Deep link to the segment (`{episode url}?t={start_offset}`).
    pub source_url: String,
    /// Start offset of the segment within the episode, in seconds.
    pub start_offset: f64,
    /// Segment text, exactly what was embedded.
    pub text: String,
    /// Raw embedding vector.
    pub embedding: Vec<f32>,
    /// When this record was created.
    pub indexed_at: DateTime<Utc>,
}

/// An immutable record sequence plus its derived search structure.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    records: Vec<EmbeddingRecord>,
    index: VectorIndex,
}

impl IndexSnapshot {
    /// Build a snapshot from a full record sequence.
    ///
    /// This is the only constructor, so the vector-count and positional
    /// alignment between records and the search structure hold by
    /// construction.
    pub fn build(records: Vec<EmbeddingRecord>) -> Self {
        let index = VectorIndex::build(records.iter().map(|r| r.embedding.as_slice()));
        debug_assert_eq!(index.len(), records.len());
        Self { records, index }
    }

    /// An empty snapshot (zero records).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    /// Top-k records for a raw query embedding, ordered by descending
    /// inner-product score.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(&EmbeddingRecord, f32)> {
        self.index
            .search(query, k)
            .into_iter()
            .map(|(position, score)| (&self.records[position], score))
            .collect()
    }
}

/// Shared handle to the currently served snapshot.
///
/// Readers clone the inner `Arc` and keep using their snapshot even if a
/// rebuild swaps in a new one mid-query.
pub struct SnapshotHandle {
    inner: RwLock<Arc<IndexSnapshot>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: IndexSnapshot) -> Self {
        Self {
            inner: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot currently being served.
    pub fn current(&self) -> Arc<IndexSnapshot> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Swap in a fully built snapshot.
    pub fn replace(&self, snapshot: IndexSnapshot) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(snapshot);
    }
}

#[cfg(test)]
pub(crate) fn test_record(source_id: &str, text: &str, embedding: Vec<f32>) -> EmbeddingRecord {
    EmbeddingRecord {
        source_id: source_id.to_string(),
        source_title: format!("{} title", source_id),
        source_url: format!("https://youtube.com/watch?v={}?t=0", source_id),
        start_offset: 0.0,
        text: text.to_string(),
        embedding,
        indexed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_alignment() {
        let records = vec![
            test_record("ep1", "first", vec![1.0, 0.0]),
            test_record("ep1", "second", vec![0.0, 1.0]),
            test_record("ep2", "third", vec![0.5, 0.5]),
        ];
        let snapshot = IndexSnapshot::build(records);

        assert_eq!(snapshot.len(), 3);

        // Position i in the search structure maps back to record i.
        let hits = snapshot.search(&[0.0, 2.0], 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.text, "second");
        assert!((hits[0].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = IndexSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.search(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn test_handle_swap_preserves_in_flight_reader() {
        let handle = SnapshotHandle::new(IndexSnapshot::build(vec![test_record(
            "ep1",
            "old",
            vec![1.0, 0.0],
        )]));

        let in_flight = handle.current();

        handle.replace(IndexSnapshot::build(vec![
            test_record("ep1", "old", vec![1.0, 0.0]),
            test_record("ep2", "new", vec![0.0, 1.0]),
        ]));

        assert_eq!(in_flight.len(), 1);
        assert_eq!(handle.current().len(), 2);
    }
}
