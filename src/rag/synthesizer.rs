//! Answer synthesis from question, history, and retrieved context.

use super::ScoredSnippet;
use crate::error::{HarkError, Result};
use crate::generation::Generator;
use crate::retry::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Attempt cap for rate-limited generation calls.
const GENERATION_MAX_ATTEMPTS: u32 = 6;

/// Composes the prompt and calls the generation model.
pub struct AnswerSynthesizer {
    generator: Arc<dyn Generator>,
    retry: RetryPolicy,
}

impl AnswerSynthesizer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            retry: RetryPolicy::new(GENERATION_MAX_ATTEMPTS, Duration::from_secs(1)),
        }
    }

    /// Override the retry policy (shorter delays in tests).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate an answer grounded in the supplied snippets.
    ///
    /// One generation call per attempt; rate-limit failures are retried
    /// with doubling backoff up to the attempt cap, anything else fails
    /// immediately.
    #[instrument(skip_all)]
    pub async fn synthesize(
        &self,
        question: &str,
        budgeted_history: &[String],
        snippets: &[ScoredSnippet],
    ) -> Result<String> {
        let prompt = compose_prompt(question, budgeted_history, snippets);
        debug!("Composed prompt of {} characters", prompt.len());

        self.retry
            .run(HarkError::is_rate_limited, || {
                self.generator.generate(&prompt)
            })
            .await
    }
}

/// Build the generation prompt. Snippets keep the retriever's
/// similarity-descending order.
fn compose_prompt(question: &str, budgeted_history: &[String], snippets: &[ScoredSnippet]) -> String {
    let context: Vec<&str> = snippets.iter().map(|s| s.record.text.as_str()).collect();
    format!(
        "Previous Conversation: {}\nQuestion: {}\nContext:\n{}",
        budgeted_history.join(" "),
        question,
        context.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_record;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct RateLimitedGenerator {
        attempts: AtomicU32,
    }

    #[async_trait]
    impl Generator for RateLimitedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(HarkError::Generation {
                message: "rate limit reached".to_string(),
                rate_limited: true,
            })
        }
    }

    struct BrokenGenerator {
        attempts: AtomicU32,
    }

    #[async_trait]
    impl Generator for BrokenGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(HarkError::Generation {
                message: "model not found".to_string(),
                rate_limited: false,
            })
        }
    }

    fn snippet(source_id: &str, text: &str, score: f32) -> ScoredSnippet {
        ScoredSnippet {
            record: test_record(source_id, text, vec![1.0, 0.0]),
            score,
        }
    }

    #[tokio::test]
    async fn test_rate_limited_call_is_attempted_exactly_six_times() {
        let generator = Arc::new(RateLimitedGenerator {
            attempts: AtomicU32::new(0),
        });
        let synthesizer = AnswerSynthesizer::new(generator.clone())
            .with_retry(RetryPolicy::new(6, Duration::ZERO));

        let result = synthesizer.synthesize("q", &[], &[]).await;

        assert!(matches!(
            result,
            Err(HarkError::Generation {
                rate_limited: true,
                ..
            })
        ));
        assert_eq!(generator.attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_non_rate_limit_error_is_not_retried() {
        let generator = Arc::new(BrokenGenerator {
            attempts: AtomicU32::new(0),
        });
        let synthesizer = AnswerSynthesizer::new(generator.clone())
            .with_retry(RetryPolicy::new(6, Duration::ZERO));

        let result = synthesizer.synthesize("q", &[], &[]).await;

        assert!(result.is_err());
        assert_eq!(generator.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prompt_layout_and_snippet_order() {
        let prompt = compose_prompt(
            "why does the sun set?",
            &["earlier turn".to_string(), "later turn".to_string()],
            &[snippet("ep1", "best match", 0.9), snippet("ep2", "runner up", 0.7)],
        );

        assert_eq!(
            prompt,
            "Previous Conversation: earlier turn later turn\n\
             Question: why does the sun set?\n\
             Context:\nbest match runner up"
        );
    }

    #[test]
    fn test_prompt_with_no_history() {
        let prompt = compose_prompt("q", &[], &[snippet("ep1", "ctx", 0.5)]);
        assert!(prompt.starts_with("Previous Conversation: \n"));
        assert!(prompt.ends_with("Context:\nctx"));
    }
}
