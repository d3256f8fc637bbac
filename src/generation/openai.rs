//! OpenAI chat-completion generator.

use super::Generator;
use crate::error::{HarkError, Result};
use crate::openai::{create_client, generation_error};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator backed by the OpenAI chat-completion API.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    system_prompt: String,
}

impl OpenAIGenerator {
    pub fn new(model: &str, system_prompt: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
        }
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| HarkError::Generation {
                    message: e.to_string(),
                    rate_limited: false,
                })?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| HarkError::Generation {
                    message: e.to_string(),
                    rate_limited: false,
                })?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| HarkError::Generation {
                message: e.to_string(),
                rate_limited: false,
            })?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(generation_error)?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| HarkError::Generation {
                message: "Empty response from model".to_string(),
                rate_limited: false,
            })?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}
