//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::{IndexStore, SnapshotHandle};
use crate::rag::ContextRetriever;
use anyhow::Result;
use std::sync::Arc;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));

    let store = IndexStore::open(&settings.index_path())?;
    let snapshot = Arc::new(SnapshotHandle::new(store.load_snapshot()?));

    let retriever = ContextRetriever::new(embedder, snapshot).with_top_k(limit);

    let spinner = Output::spinner("Searching...");
    let result = retriever.retrieve(query).await;
    spinner.finish_and_clear();

    match result {
        Ok(snippets) => {
            if snippets.is_empty() {
                Output::info("No results.");
                return Ok(());
            }

            for snippet in &snippets {
                Output::search_result(
                    &snippet.record.source_title,
                    snippet.score,
                    &snippet.record.text,
                    &snippet.record.source_url,
                );
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            Err(e.into())
        }
    }
}
