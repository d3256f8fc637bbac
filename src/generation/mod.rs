//! Answer generation via a chat-completion model.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for generation services.
///
/// Implementations make exactly one attempt per call; retry policy belongs
/// to the synthesizer, which knows which failures are worth retrying.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
