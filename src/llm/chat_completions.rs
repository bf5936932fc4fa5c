//! OpenAI Chat Completions API client.
//!
//! Implements [`CompletionClient`] for `/v1/chat/completions` as a single
//! blocking round trip: no streaming, no retry, no client-side timeout.

use anyhow::{Context, anyhow};

use super::{CompletionClient, CompletionRequest, LlmSettings};

/// Client for the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Create a new Chat Completions client with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn request_body(&self, req: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.settings.model,
            "messages": req.messages,
            "temperature": req.temperature.unwrap_or(self.settings.temperature),
        });
        if req.json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let url = self
            .settings
            .provider
            .build_chat_url(&self.settings.base_url);
        let body = self.request_body(&req);

        tracing::debug!(
            url = %url,
            model = %self.settings.model,
            message_count = req.messages.len(),
            json_mode = req.json_mode,
            "Sending completion request"
        );

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = if self.settings.provider.uses_api_key_header() {
                rb.header("api-key", k)
            } else {
                rb.bearer_auth(k)
            };
        }

        let resp = rb
            .send()
            .await
            .context("completion request failed")?
            .error_for_status()?;
        let v: serde_json::Value = resp.json().await?;

        let content = v["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("completion response carried no message content"))?;

        Ok(content.to_string())
    }
}
