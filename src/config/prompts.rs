//! Prompt templates for Hark.
//!
//! The defaults can be overridden by pointing `prompts.custom_path` at a
//! TOML file with the same structure.

use serde::{Deserialize, Serialize};

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompts for RAG response generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// System prompt that grounds the model in the retrieved context.
    pub system: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful assistant that answers questions about a podcast \
                     using excerpts from its transcripts.\n\n\
                     Guidelines:\n\
                     - Answer using only the supplied context and conversation\n\
                     - If the context does not contain the answer, say you are not sure \
                     rather than guessing\n\
                     - Be concise and keep the speaker's terminology"
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying an optional TOML override file.
    pub fn load(custom_path: Option<&str>) -> crate::error::Result<Self> {
        match custom_path {
            Some(path) => {
                let content = std::fs::read_to_string(crate::config::Settings::expand_path(path))?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_grounds_in_context() {
        let prompts = Prompts::default();
        assert!(prompts.rag.system.contains("only the supplied context"));
        assert!(prompts.rag.system.contains("not sure"));
    }

    #[test]
    fn test_custom_prompt_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.toml");
        std::fs::write(&path, "[rag]\nsystem = \"custom system prompt\"\n").unwrap();

        let prompts = Prompts::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(prompts.rag.system, "custom system prompt");
    }
}
