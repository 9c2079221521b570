//! The text-generation capability and its production implementation.
//!
//! The pipeline needs exactly two operations from a language model: "submit
//! prompt, receive narrative text" and "submit prompt, receive JSON text".
//! [`ChangeModel`] captures that pair and nothing else, so the orchestrator
//! and comparator never see providers, messages, or transport concerns — and
//! tests can script responses deterministically.
//!
//! [`ProviderModel`] is the production implementation, backed by an
//! `edgequake-llm` provider (OpenAI / Anthropic / Gemini / Ollama / …).

use crate::config::CompareConfig;
use crate::error::{ModelError, PdfDiffError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// Sampling temperature for JSON comparison calls. Near-deterministic output
/// keeps the response parseable and faithful to the chunk text.
const JSON_TEMPERATURE: f32 = 0.2;

/// Sampling temperature for narrative synthesis. Slightly higher so the
/// summary reads as prose rather than a list.
const TEXT_TEMPERATURE: f32 = 0.3;

/// The generation capability the pipeline depends on.
///
/// Implementations must be cheap to share (`Arc<dyn ChangeModel>`); the
/// orchestrator issues calls strictly sequentially, so no internal
/// synchronisation beyond `Send + Sync` is required.
#[async_trait]
pub trait ChangeModel: Send + Sync {
    /// Request a plain narrative completion.
    async fn generate_text(&self, prompt: &str) -> Result<String, ModelError>;

    /// Request a completion that is expected to be a single JSON object.
    ///
    /// The returned string is *not* guaranteed to parse — response validation
    /// and salvage belong to the caller ([`crate::pipeline::compare`]).
    async fn generate_json(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Production [`ChangeModel`] backed by an `edgequake-llm` provider.
pub struct ProviderModel {
    provider: Arc<dyn LLMProvider>,
    max_tokens: usize,
}

impl ProviderModel {
    pub fn new(provider: Arc<dyn LLMProvider>, max_tokens: usize) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    async fn chat(&self, prompt: &str, temperature: f32) -> Result<String, ModelError> {
        let messages = vec![ChatMessage::user(prompt)];
        let options = CompletionOptions {
            temperature: Some(temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        };

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| classify_provider_error(&e.to_string()))?;

        debug!(
            "model call: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        if response.content.trim().is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(response.content)
    }
}

#[async_trait]
impl ChangeModel for ProviderModel {
    async fn generate_text(&self, prompt: &str) -> Result<String, ModelError> {
        self.chat(prompt, TEXT_TEMPERATURE).await
    }

    async fn generate_json(&self, prompt: &str) -> Result<String, ModelError> {
        self.chat(prompt, JSON_TEMPERATURE).await
    }
}

/// Split provider errors into "the request was refused" and everything else.
///
/// edgequake-llm reports content-filter refusals as API errors whose message
/// names the filter; those become [`ModelError::Blocked`] so the failure
/// description cites the rejection reason rather than a generic transport
/// fault.
fn classify_provider_error(message: &str) -> ModelError {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("content_filter")
        || lowered.contains("content filter")
        || lowered.contains("blocked")
        || lowered.contains("safety")
    {
        ModelError::Blocked {
            reason: message.to_string(),
        }
    } else {
        ModelError::Transport {
            message: message.to_string(),
        }
    }
}

/// Resolve the generation capability, from most-specific to least-specific.
///
/// Mirrors the provider fallback chain used across edgequake tools:
///
/// 1. **Pre-built capability** (`config.generator`) — the caller constructed
///    the whole [`ChangeModel`]; used as-is. This is the test seam and the
///    hook for custom middleware (caching, client-side rate limiting).
///
/// 2. **Pre-built provider** (`config.provider`) — an `edgequake-llm`
///    provider the caller configured; wrapped in [`ProviderModel`].
///
/// 3. **Named provider + model** (`config.provider_name`) — resolved via
///    [`ProviderFactory::create_llm_provider`], which reads the matching API
///    key from the environment.
///
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    honoured when both are set, so an execution environment (Makefile, CI)
///    can pick the model even when several API keys are present.
///
/// 5. **Full auto-detection** (`ProviderFactory::from_env`) — scans known API
///    key variables and picks the first available provider.
pub fn resolve_model(config: &CompareConfig) -> Result<Arc<dyn ChangeModel>, PdfDiffError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    if let Some(ref provider) = config.provider {
        return Ok(Arc::new(ProviderModel::new(
            Arc::clone(provider),
            config.max_tokens,
        )));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let provider = create_provider(name, model)?;
        return Ok(Arc::new(ProviderModel::new(provider, config.max_tokens)));
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            let provider = create_provider(&prov, &model)?;
            return Ok(Arc::new(ProviderModel::new(provider, config.max_tokens)));
        }
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PdfDiffError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(Arc::new(ProviderModel::new(provider, config.max_tokens)))
}

/// Model used when the caller names a provider without naming a model.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, PdfDiffError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PdfDiffError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_filter_errors_classify_as_blocked() {
        assert!(matches!(
            classify_provider_error("finish_reason=content_filter"),
            ModelError::Blocked { .. }
        ));
        assert!(matches!(
            classify_provider_error("request blocked by safety system"),
            ModelError::Blocked { .. }
        ));
    }

    #[test]
    fn other_errors_classify_as_transport() {
        let e = classify_provider_error("connection reset by peer");
        match e {
            ModelError::Transport { message } => {
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }
}
