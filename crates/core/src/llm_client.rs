use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// A client that turns a single prompt into a single completion.
///
/// Each call is independent: no system instructions, no conversation history,
/// just the one user message.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the text of the first completion choice, untrimmed.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// An implementation of `CompletionClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "gpt-3.5-turbo").
    /// * `max_tokens` - Upper bound on the length of each completion.
    pub fn new(config: OpenAIConfig, model: String, max_tokens: u32) -> Self {
        Self {
            client: Client::with_config(config),
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    #[allow(deprecated)]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .max_tokens(self.max_tokens)
            .build()?;

        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;
        debug!(model = %response.model, choices = response.choices.len(), "Completion received");

        let content = response
            .choices
            .into_iter()
            .next()
            .context("No response choice from LLM")?
            .message
            .content
            .context("No content in LLM response")?;

        Ok(content)
    }
}
