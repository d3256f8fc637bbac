//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::rag::RagEngine;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, top_k: usize, settings: Settings) -> Result<()> {
    let mut settings = settings;
    settings.rag.top_k = top_k;

    let engine = RagEngine::from_settings(&settings)?;

    let spinner = Output::spinner("Searching the corpus...");

    match engine.answer_question(question, &[]).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::kv(&source.episode_title, &source.youtube_url);
                }
            }
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}
