//! Error types for Hark.

use thiserror::Error;

/// Library-level error type for Hark operations.
#[derive(Error, Debug)]
pub enum HarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Embedding service error: {message}")]
    Embedding {
        message: String,
        /// Whether the failure is worth retrying (rate limit, network, 5xx).
        transient: bool,
    },

    #[error("Generation service error: {message}")]
    Generation {
        message: String,
        /// Whether the service signalled a rate limit.
        rate_limited: bool,
    },

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("The index contains no records; run `hark index` first")]
    EmptyIndex,

    #[error("Index build failed for source '{source_id}': {message}")]
    IndexBuild { source_id: String, message: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Index store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl HarkError {
    /// True for embedding failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, HarkError::Embedding { transient: true, .. })
    }

    /// True for generation failures caused by rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, HarkError::Generation { rate_limited: true, .. })
    }
}

/// Result type alias for Hark operations.
pub type Result<T> = std::result::Result<T, HarkError>;
