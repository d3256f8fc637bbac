//! Episode catalog and the transcript source boundary.
//!
//! The catalog is a JSON array of episodes produced upstream by the feed
//! scraper; transcripts live one file per source under a directory, also
//! produced upstream. This crate only ever reads both.

use crate::error::{HarkError, Result};
use crate::segmenter::MicroEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One episode known to the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Sanitized, unique source identifier (also the transcript file stem).
    pub source_id: String,
    /// Episode title.
    pub title: String,
    /// Episode URL (without a timestamp parameter).
    pub url: String,
}

/// Load the episode catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        HarkError::Catalog(format!("Cannot read catalog {}: {}", path.display(), e))
    })?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;
    debug!("Loaded catalog with {} entries", entries.len());
    Ok(entries)
}

/// Boundary to wherever raw transcripts live.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the ordered micro-entries for one source.
    ///
    /// `Ok(None)` means the transcript is absent; the caller skips the
    /// source rather than failing the batch.
    async fn fetch(&self, source_id: &str) -> Result<Option<Vec<MicroEntry>>>;
}

/// Filesystem transcript source reading `<dir>/<source_id>.json`,
/// a JSON array of `{"start": f64, "text": string}` entries.
pub struct FsTranscriptSource {
    dir: PathBuf,
}

impl FsTranscriptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TranscriptSource for FsTranscriptSource {
    async fn fetch(&self, source_id: &str) -> Result<Option<Vec<MicroEntry>>> {
        let path = self.dir.join(format!("{}.json", source_id));
        if !path.exists() {
            debug!("No transcript file at {:?}", path);
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let entries: Vec<MicroEntry> = serde_json::from_str(&content)?;
        Ok(Some(entries))
    }
}
