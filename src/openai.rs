//! OpenAI client configuration and error classification.

use async_openai::error::OpenAIError;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

use crate::error::HarkError;

/// Default timeout for OpenAI API requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client with configured timeout.
pub fn create_client() -> Client<OpenAIConfig> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

/// Whether an API failure signalled a rate limit.
fn is_rate_limit(error: &OpenAIError) -> bool {
    match error {
        OpenAIError::ApiError(api) => {
            api.r#type.as_deref() == Some("rate_limit_exceeded")
                || api.code.as_deref() == Some("rate_limit_exceeded")
                || api.message.to_lowercase().contains("rate limit")
        }
        _ => false,
    }
}

/// Whether an API failure is worth retrying: rate limits, network errors,
/// and server-side failures. Bad requests and auth errors are not.
fn is_transient(error: &OpenAIError) -> bool {
    match error {
        OpenAIError::Reqwest(_) => true,
        OpenAIError::ApiError(api) => {
            is_rate_limit(error) || api.r#type.as_deref() == Some("server_error")
        }
        _ => false,
    }
}

/// Map an embedding API failure onto the embedding-service boundary error.
pub fn embedding_error(error: OpenAIError) -> HarkError {
    HarkError::Embedding {
        transient: is_transient(&error),
        message: error.to_string(),
    }
}

/// Map a chat-completion API failure onto the generation-service boundary error.
pub fn generation_error(error: OpenAIError) -> HarkError {
    HarkError::Generation {
        rate_limited: is_rate_limit(&error),
        message: error.to_string(),
    }
}
