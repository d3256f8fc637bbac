//! CLI module for Hark.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Hark - Podcast Transcript RAG
///
/// Build an embedding index from podcast transcripts and ask questions
/// with cited, context-grounded answers.
#[derive(Parser, Debug)]
#[command(name = "hark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed new transcripts and rebuild the search index
    Index {
        /// Path to the episodes JSON catalog (overrides configuration)
        #[arg(long)]
        catalog: Option<String>,
    },

    /// Ask a question and get an answer with sources
    Ask {
        /// The question to ask
        question: String,

        /// Number of context snippets to retrieve
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Search for relevant transcript passages
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List indexed sources
    List,

    /// Start the HTTP question-answering server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
