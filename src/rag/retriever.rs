//! Context retrieval over the embedding index.

use super::ScoredSnippet;
use crate::embedding::Embedder;
use crate::error::{HarkError, Result};
use crate::index::SnapshotHandle;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of context snippets per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Turns a question into ranked context snippets.
pub struct ContextRetriever {
    embedder: Arc<dyn Embedder>,
    snapshot: Arc<SnapshotHandle>,
    top_k: usize,
}

impl ContextRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, snapshot: Arc<SnapshotHandle>) -> Self {
        Self {
            embedder,
            snapshot,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set how many snippets a retrieval returns at most.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Retrieve the top-k snippets for a question, similarity-descending.
    ///
    /// A zero-record index is reported as [`HarkError::EmptyIndex`] rather
    /// than an empty result: it almost always means the index was never
    /// built, not that nothing matched.
    #[instrument(skip(self, question))]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredSnippet>> {
        let snapshot = self.snapshot.current();
        if snapshot.is_empty() {
            return Err(HarkError::EmptyIndex);
        }

        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| HarkError::Retrieval(format!("Query embedding failed: {}", e)))?;

        let snippets: Vec<ScoredSnippet> = snapshot
            .search(&query_embedding, self.top_k)
            .into_iter()
            .map(|(record, score)| ScoredSnippet {
                record: record.clone(),
                score,
            })
            .collect();

        debug!("Retrieved {} snippets", snippets.len());
        Ok(snippets)
    }
}
