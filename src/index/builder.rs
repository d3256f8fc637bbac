//! Incremental, resumable index building.
//!
//! Each run embeds only the catalog sources whose identifier is not yet in
//! the persisted record set, appends their records after the existing ones,
//! and rebuilds the snapshot from the complete sequence. A source that
//! fails (missing transcript, embedding retries exhausted) is logged and
//! left out of this run, so the next run picks it up again; it never takes
//! the rest of the batch down with it.

use super::{EmbeddingRecord, IndexSnapshot, IndexStore};
use crate::catalog::{CatalogEntry, TranscriptSource};
use crate::embedding::Embedder;
use crate::error::{HarkError, Result};
use crate::segmenter::Segmenter;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of one index-build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Sources embedded and merged this run.
    pub sources_indexed: usize,
    /// Sources already present in the persisted record set.
    pub sources_skipped: usize,
    /// Sources abandoned this run (absent transcript or service failure);
    /// they stay eligible for the next run.
    pub sources_failed: usize,
    /// Records appended this run.
    pub records_added: usize,
    /// Total records after the merge.
    pub records_total: usize,
}

/// Builds the embedding index from the episode catalog.
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    transcripts: Arc<dyn TranscriptSource>,
    store: Arc<IndexStore>,
    segmenter: Segmenter,
    max_concurrent: usize,
}

impl IndexBuilder {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        transcripts: Arc<dyn TranscriptSource>,
        store: Arc<IndexStore>,
        segmenter: Segmenter,
        max_concurrent: usize,
    ) -> Self {
        Self {
            embedder,
            transcripts,
            store,
            segmenter,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run one build pass over the catalog.
    ///
    /// Returns the report and the snapshot rebuilt from the full merged
    /// record sequence.
    #[instrument(skip(self, catalog), fields(catalog_len = catalog.len()))]
    pub async fn build(&self, catalog: &[CatalogEntry]) -> Result<(BuildReport, IndexSnapshot)> {
        let existing = self.store.load_records()?;
        let indexed: HashSet<&str> = existing.iter().map(|r| r.source_id.as_str()).collect();

        let pending: Vec<&CatalogEntry> = catalog
            .iter()
            .filter(|e| !indexed.contains(e.source_id.as_str()))
            .collect();

        let mut report = BuildReport {
            sources_skipped: catalog.len() - pending.len(),
            ..BuildReport::default()
        };

        info!(
            "Index build: {} pending, {} already indexed",
            pending.len(),
            report.sources_skipped
        );

        // Workers share no mutable state; each yields its own record batch
        // and the merge happens here after the pool drains.
        let mut results = stream::iter(pending.into_iter())
            .map(|entry| async move { (entry, self.index_source(entry).await) })
            .buffer_unordered(self.max_concurrent);

        let mut new_records: Vec<EmbeddingRecord> = Vec::new();

        while let Some((entry, result)) = results.next().await {
            match result {
                Ok(Some(records)) => {
                    info!(
                        "Indexed '{}' ({} segments)",
                        entry.source_id,
                        records.len()
                    );
                    report.sources_indexed += 1;
                    new_records.extend(records);
                }
                Ok(None) => {
                    warn!("No transcript for '{}', skipping", entry.source_id);
                    report.sources_failed += 1;
                }
                Err(e) => {
                    warn!("Abandoning source for this run: {}", e);
                    report.sources_failed += 1;
                }
            }
        }

        // Append-only merge: existing rows are never reordered or rewritten.
        report.records_added = self.store.append_records(&new_records)?;

        let mut all_records = existing;
        all_records.extend(new_records);
        report.records_total = all_records.len();

        let snapshot = IndexSnapshot::build(all_records);
        info!(
            "Index build complete: +{} records, {} total",
            report.records_added, report.records_total
        );

        Ok((report, snapshot))
    }

    /// Embed one source. `Ok(None)` means the transcript is absent.
    async fn index_source(&self, entry: &CatalogEntry) -> Result<Option<Vec<EmbeddingRecord>>> {
        let Some(micro_entries) = self.transcripts.fetch(&entry.source_id).await? else {
            return Ok(None);
        };

        let segments = self.segmenter.segment(&entry.source_id, &micro_entries);
        if segments.is_empty() {
            return Ok(Some(Vec::new()));
        }

        // Segments embed as one ordered batch; the embedder preserves
        // input order and owns the transient-failure retry budget.
        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let embeddings =
            self.embedder
                .embed_batch(&texts)
                .await
                .map_err(|e| HarkError::IndexBuild {
                    source_id: entry.source_id.clone(),
                    message: e.to_string(),
                })?;

        let indexed_at = Utc::now();
        let records = segments
            .into_iter()
            .zip(embeddings)
            .map(|(segment, embedding)| EmbeddingRecord {
                source_url: format!("{}?t={}", entry.url, segment.start_offset),
                source_id: segment.source_id,
                source_title: entry.title.clone(),
                start_offset: segment.start_offset,
                text: segment.text,
                embedding,
                indexed_at,
            })
            .collect();

        Ok(Some(records))
    }
}
