//! Query translation.
//!
//! Turns a raw search string into a [`GeneratedQuery`]. Three prefixes
//! (`actor:`, `director:`, `genre:`) map straight onto fixed templates and
//! never reach the model. Anything else is sent to the completion service
//! with [`prompt::SYSTEM_PROMPT`]; if that call or the parse of its answer
//! fails, the translator degrades to a title/description substring search.
//! [`Translator::translate`] therefore cannot fail.

pub mod guard;
pub mod prompt;
pub mod templates;

pub use guard::{GuardViolation, QueryGuard};
pub use templates::{SearchPrefix, clean_search_value};

use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::graph::{Params, params};
use crate::llm::{CompletionClient, CompletionRequest};

/// A query ready for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub cypher: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Params,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
}

/// Models write `"params": null` as often as they leave the key out.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl GeneratedQuery {
    /// The substring search used whenever translation fails.
    pub fn fallback(query: &str) -> Self {
        Self {
            cypher: templates::FALLBACK_SEARCH.to_string(),
            params: params([("query", query)]),
            explanation: templates::FALLBACK_EXPLANATION.to_string(),
        }
    }

    fn from_prefix(prefix: SearchPrefix, raw_value: &str) -> Self {
        let value = clean_search_value(raw_value);
        Self {
            cypher: prefix.template().to_string(),
            explanation: prefix.explain(&value),
            params: params([("value", value)]),
        }
    }
}

/// Natural-language to Cypher translator.
#[derive(Debug, Clone)]
pub struct Translator {
    client: Arc<dyn CompletionClient>,
    guard: Option<QueryGuard>,
}

impl Translator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            guard: None,
        }
    }

    /// Refuse model output that fails the guard, falling back instead.
    #[must_use]
    pub fn with_guard(mut self, guard: QueryGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub async fn translate(&self, query: &str) -> GeneratedQuery {
        if let Some((prefix, rest)) = SearchPrefix::split(query) {
            let generated = GeneratedQuery::from_prefix(prefix, rest);
            tracing::debug!(
                prefix = ?prefix,
                params = %serde_json::Value::Object(generated.params.clone()),
                "Resolved prefixed query to template"
            );
            return generated;
        }

        match self.generate(query).await {
            Ok(generated) => {
                tracing::info!(
                    cypher = %generated.cypher.trim(),
                    explanation = %generated.explanation,
                    "Generated Cypher"
                );
                generated
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "LLM generation failed, using fallback search");
                GeneratedQuery::fallback(query)
            }
        }
    }

    async fn generate(&self, query: &str) -> anyhow::Result<GeneratedQuery> {
        let request = CompletionRequest::json(prompt::SYSTEM_PROMPT, prompt::user_prompt(query));
        let text = self.client.complete(request).await?;
        let generated: GeneratedQuery =
            serde_json::from_str(&text).context("model response is not a query object")?;

        if let Some(guard) = &self.guard {
            guard.check(&generated.cypher)?;
        }
        Ok(generated)
    }
}
