//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Ties retrieval, history budgeting, and answer synthesis into one
//! request/response cycle.

pub mod engine;
pub mod history;
pub mod retriever;
pub mod synthesizer;

pub use engine::RagEngine;
pub use history::budget_history;
pub use retriever::ContextRetriever;
pub use synthesizer::AnswerSynthesizer;

use crate::index::EmbeddingRecord;
use serde::{Deserialize, Serialize};

/// One prior conversation turn: the `[any, string]` pair of the request
/// boundary. Only the text half participates in budgeting and prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn(pub serde_json::Value, pub String);

impl HistoryTurn {
    pub fn text(&self) -> &str {
        &self.1
    }
}

/// A retrieved context snippet with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredSnippet {
    pub record: EmbeddingRecord,
    pub score: f32,
}

/// A source citation as disclosed to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub episode_title: String,
    pub relevant_snippet: String,
    pub youtube_url: String,
}

/// Answer plus the exact sources the model was shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    #[serde(rename = "open_ai_response")]
    pub answer: String,
    #[serde(rename = "context_responses")]
    pub sources: Vec<SourceRef>,
}
