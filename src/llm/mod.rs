//! Completion-service client.
//!
//! The translator only ever needs one thing from a language model: a single
//! non-streaming completion for a system prompt plus one user message, with
//! the model asked to answer in JSON. [`CompletionClient`] is that seam;
//! [`ChatCompletionsClient`] implements it against any OpenAI-compatible
//! Chat Completions endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use movie_graph_explorer::llm::{ChatCompletionsClient, CompletionRequest, LlmSettings};
//!
//! let client = ChatCompletionsClient::new(settings);
//! let text = client.complete(CompletionRequest::json("system", "user")).await?;
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsClient;
pub use provider::Provider;

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gpt-4-turbo-preview`).
    pub model: String,
    /// Sampling temperature sent with every completion.
    pub temperature: f32,
    /// Provider type (auto-detected from `base_url`).
    pub provider: Provider,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("provider", &self.provider)
            .finish()
    }
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text content of the message.
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
}

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation messages, system prompt first.
    pub messages: Vec<Message>,
    /// Ask the provider to constrain output to a JSON object.
    pub json_mode: bool,
    /// Per-request temperature override.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Build a JSON-mode request from a system prompt and one user message.
    #[must_use]
    pub fn json(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            json_mode: true,
            temperature: None,
        }
    }
}

/// Trait for completion-service clients.
///
/// Implementations return the raw text of the first choice. They never
/// interpret it; parsing is the caller's job.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug {
    /// Request one completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the response carries no message content.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;
}
