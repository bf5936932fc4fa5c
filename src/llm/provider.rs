//! Endpoint flavours of the Chat Completions API.
//!
//! Only two things differ between the services we talk to: the request URL
//! and the header that carries the key.

/// API version sent to Azure when none is configured.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-08-01-preview";

/// Which Chat Completions flavour a base URL speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    /// api.openai.com
    OpenAI,
    /// Azure `OpenAI` Service; URLs are per deployment.
    AzureOpenAI {
        deployment_name: String,
        api_version: String,
    },
    /// Anything else that mirrors the `OpenAI` wire format (Ollama, vLLM,
    /// `OpenRouter`, Groq, ...).
    Compatible,
}

impl Provider {
    /// Guess the flavour from the host name.
    ///
    /// Azure is detected without a deployment; callers fill it in from
    /// configuration.
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let host = base_url
            .split_once("://")
            .map_or(base_url, |(_, rest)| rest)
            .split(['/', ':'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if host.ends_with(".azure.com") {
            Self::AzureOpenAI {
                deployment_name: String::new(),
                api_version: DEFAULT_AZURE_API_VERSION.to_string(),
            }
        } else if host == "api.openai.com" {
            Self::OpenAI
        } else {
            Self::Compatible
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::AzureOpenAI { .. } => "azure",
            Self::Compatible => "openai-compatible",
        }
    }

    /// Azure wants `api-key: <key>`; everyone else `Authorization: Bearer <key>`.
    #[must_use]
    pub fn uses_api_key_header(&self) -> bool {
        matches!(self, Self::AzureOpenAI { .. })
    }

    /// Full completions URL for `base_url` (trailing slash and `/v1` tolerated).
    #[must_use]
    pub fn build_chat_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if let Self::AzureOpenAI {
            deployment_name,
            api_version,
        } = self
        {
            return format!(
                "{base}/openai/deployments/{deployment_name}/chat/completions?api-version={api_version}"
            );
        }

        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{base}/v1/chat/completions")
    }
}
