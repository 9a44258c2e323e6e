//! Seam for the external text-generation backend.
//!
//! The pipeline treats the backend as an opaque `complete(prompt) -> String`
//! call; everything about interpreting the response (JSON extraction,
//! validation, clamping) lives with the callers. Only infrastructure
//! failures surface here as errors.

mod extract;

pub use extract::extract_json_object;
pub(crate) use extract::{number_field, string_field, string_list};

use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;

/// Per-call knobs forwarded to the backend.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 900,
        }
    }
}

/// Infrastructure failures from the text-generation backend.
///
/// Malformed *content* in an otherwise successful response is not an error
/// at this layer; callers handle that as an expected degenerate case.
#[derive(Debug, thiserror::Error)]
pub enum TextGenerationError {
    #[error("text generation backend unavailable: {0}")]
    Unavailable(String),
    #[error("text generation backend returned an empty response")]
    Empty,
}

/// Contract for remote text generation.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, TextGenerationError>;
}

/// `TextGeneration` backed by an OpenAI-compatible chat completion API.
#[derive(Clone)]
pub struct OpenAiTextGeneration {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTextGeneration {
    pub fn new(api_key: &str, model: String) -> Self {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
        Self { client, model }
    }
}

#[async_trait]
impl TextGeneration for OpenAiTextGeneration {
    async fn complete(
        &self,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, TextGenerationError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|err| TextGenerationError::Unavailable(err.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .temperature(options.temperature)
            .max_tokens(options.max_tokens)
            .n(1)
            .build()
            .map_err(|err| TextGenerationError::Unavailable(err.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|err| TextGenerationError::Unavailable(err.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        match content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(TextGenerationError::Empty),
        }
    }
}
