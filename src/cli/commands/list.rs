//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::index::IndexStore;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let store = IndexStore::open(&settings.index_path())?;
    let sources = store.list_sources()?;

    if sources.is_empty() {
        Output::info("The index is empty. Run 'hark index' to build it.");
        return Ok(());
    }

    Output::header(&format!("Indexed sources ({})", sources.len()));
    for source in &sources {
        Output::source_info(&source.source_title, &source.source_id, source.record_count);
    }

    let total = store.record_count()?;
    println!();
    Output::info(&format!("{} records total", total));

    Ok(())
}
