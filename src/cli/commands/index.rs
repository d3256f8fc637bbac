//! Index command implementation.

use crate::catalog::{load_catalog, FsTranscriptSource};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::{IndexBuilder, IndexStore};
use crate::segmenter::Segmenter;
use anyhow::Result;
use std::sync::Arc;

/// Run the index command.
pub async fn run_index(catalog_path: Option<String>, settings: Settings) -> Result<()> {
    let catalog_path = catalog_path
        .map(|p| Settings::expand_path(&p))
        .unwrap_or_else(|| settings.catalog_path());

    let catalog = load_catalog(&catalog_path)?;
    Output::info(&format!(
        "Catalog: {} episodes ({})",
        catalog.len(),
        catalog_path.display()
    ));

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let transcripts = Arc::new(FsTranscriptSource::new(settings.transcripts_dir()));
    let store = Arc::new(IndexStore::open(&settings.index_path())?);

    let builder = IndexBuilder::new(
        embedder,
        transcripts,
        store,
        Segmenter::new(settings.segmenter.max_chunk_seconds),
        settings.index.max_concurrent_sources,
    );

    let spinner = Output::spinner("Embedding new transcripts...");
    let result = builder.build(&catalog).await;
    spinner.finish_and_clear();

    match result {
        Ok((report, _snapshot)) => {
            Output::success(&format!(
                "Indexed {} sources (+{} records)",
                report.sources_indexed, report.records_added
            ));
            Output::kv("Already indexed", &report.sources_skipped.to_string());
            Output::kv("Failed this run", &report.sources_failed.to_string());
            Output::kv("Total records", &report.records_total.to_string());
            if report.sources_failed > 0 {
                Output::warning("Failed sources stay eligible for the next run.");
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Index build failed: {}", e));
            Err(e.into())
        }
    }
}
