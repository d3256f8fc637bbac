//! Hark - Podcast Transcript RAG
//!
//! Ask natural-language questions against a podcast transcript corpus and
//! get answers grounded in the passages that back them up.
//!
//! "Hark" is archaic English for "listen."
//!
//! # Overview
//!
//! Hark lets you:
//! - Build an embedding index from segmented episode transcripts,
//!   incrementally and resumably
//! - Search the corpus semantically
//! - Ask questions and get cited answers over HTTP or the CLI
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `catalog` - Episode catalog and transcript source boundary
//! - `segmenter` - Bounded-duration transcript segmentation
//! - `embedding` - Embedding generation
//! - `generation` - Answer generation
//! - `index` - Embedding records, vector search, persistence, and the
//!   incremental builder
//! - `rag` - Retrieval, history budgeting, and answer synthesis
//! - `retry` - Bounded retry with exponential backoff
//!
//! # Example
//!
//! ```rust,no_run
//! use hark::config::Settings;
//! use hark::rag::RagEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let engine = RagEngine::from_settings(&settings)?;
//!
//!     let response = engine.answer_question("What was said about sleep?", &[]).await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod openai;
pub mod rag;
pub mod retry;
pub mod segmenter;

pub use error::{HarkError, Result};
