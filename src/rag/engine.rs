//! The RAG orchestrator: one question in, answer plus sources out.

use super::{
    budget_history, AnswerSynthesizer, ContextRetriever, HistoryTurn, RagResponse, ScoredSnippet,
    SourceRef,
};
use crate::config::{Prompts, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::error::{HarkError, Result};
use crate::generation::OpenAIGenerator;
use crate::index::{IndexStore, SnapshotHandle};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::{info, instrument};

/// Question-answering engine over the indexed corpus.
pub struct RagEngine {
    retriever: ContextRetriever,
    synthesizer: AnswerSynthesizer,
    max_history_words: usize,
}

impl RagEngine {
    pub fn new(
        retriever: ContextRetriever,
        synthesizer: AnswerSynthesizer,
        max_history_words: usize,
    ) -> Self {
        Self {
            retriever,
            synthesizer,
            max_history_words,
        }
    }

    /// Assemble an engine from settings: OpenAI clients, the persisted
    /// index loaded into a snapshot, and the configured budgets.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_path.as_deref())?;

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let store = IndexStore::open(&settings.index_path())?;
        let snapshot = Arc::new(SnapshotHandle::new(store.load_snapshot()?));

        let retriever =
            ContextRetriever::new(embedder, snapshot).with_top_k(settings.rag.top_k);

        let generator = Arc::new(OpenAIGenerator::new(
            &settings.generation.model,
            &prompts.rag.system,
        ));
        let synthesizer = AnswerSynthesizer::new(generator);

        Ok(Self::new(
            retriever,
            synthesizer,
            settings.rag.max_history_words,
        ))
    }

    /// Answer a question with conversation history.
    ///
    /// Retrieval happens once; the same snippets feed the prompt and the
    /// returned sources, so the citations are exactly what the model saw.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn answer_question(
        &self,
        question: &str,
        history: &[HistoryTurn],
    ) -> Result<RagResponse> {
        if question.trim().is_empty() {
            return Err(HarkError::Validation(
                "The 'message' field must be a non-empty string.".to_string(),
            ));
        }

        let snippets = self.retriever.retrieve(question).await?;
        let budgeted = budget_history(history, question, self.max_history_words);

        info!(
            "Answering with {} snippets, {} history turns kept",
            snippets.len(),
            budgeted.len()
        );

        let answer = self
            .synthesizer
            .synthesize(question, &budgeted, &snippets)
            .await?;

        Ok(RagResponse {
            answer,
            sources: snippets.iter().map(format_source).collect(),
        })
    }
}

/// Format one retrieved snippet as a caller-facing citation.
fn format_source(snippet: &ScoredSnippet) -> SourceRef {
    SourceRef {
        episode_title: snippet.record.source_title.clone(),
        relevant_snippet: snippet.record.text.replace('\n', " "),
        youtube_url: canonical_url(&snippet.record.source_url),
    }
}

/// Strip sub-second precision from a `t=` timestamp parameter, so deep
/// links use whole seconds.
fn canonical_url(url: &str) -> String {
    static TIMESTAMP_FRACTION: OnceLock<Regex> = OnceLock::new();
    let re = TIMESTAMP_FRACTION.get_or_init(|| Regex::new(r"(t=\d+)\.\d+").expect("valid regex"));
    re.replace_all(url, "$1").into_owned()
}
