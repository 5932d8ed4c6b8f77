//! LLM-backed gloss translation via the OpenAI API.

use super::GlossTranslator;
use crate::error::GlossError;
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an ASL gloss transcriber. Convert the English text you \
receive into ASL gloss notation: uppercase signs, topic-comment order where natural, \
no articles or copulas, time markers first. Return only the gloss text, nothing else.";

/// Gloss translator backed by an OpenAI chat model.
pub struct OpenAiGloss {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiGloss {
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl GlossTranslator for OpenAiGloss {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn translate(&self, text: &str) -> std::result::Result<String, GlossError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| GlossError::Unavailable(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text.to_string())
                .build()
                .map_err(|e| GlossError::Unavailable(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.3)
            .build()
            .map_err(|e| GlossError::Unavailable(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GlossError::Unavailable(format!("Gloss request failed: {}", e)))?;

        let gloss = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GlossError::Unavailable("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        debug!("Received {} gloss characters from {}", gloss.len(), self.model);

        Ok(gloss)
    }
}
