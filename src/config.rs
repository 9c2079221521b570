//! Configuration types for PDF document comparison.
//!
//! All comparison behaviour is controlled through [`CompareConfig`], built
//! via its [`CompareConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::PdfDiffError;
use crate::model::ChangeModel;
use crate::pacing::{ConstantPacing, RateLimitPolicy};
use crate::progress::CompareProgressCallback;
use crate::prompts::PROMPT_OVERHEAD_ESTIMATE;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for a document comparison.
///
/// Built via [`CompareConfig::builder()`] or using
/// [`CompareConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2diff::CompareConfig;
///
/// let config = CompareConfig::builder()
///     .model("gpt-4.1-nano")
///     .chunk_budget(8000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CompareConfig {
    /// LLM model identifier, e.g. "gpt-4.1-nano", "claude-sonnet-4-20250514".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "gemini").
    /// If None along with `provider`, providers are auto-detected from the
    /// environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed generation capability. Takes precedence over every
    /// provider field. This is the injection point for tests and for custom
    /// middleware (caching, client-side rate limiting).
    pub generator: Option<Arc<dyn ChangeModel>>,

    /// Maximum characters of a full chunk-comparison prompt. Default: 8000.
    ///
    /// [`crate::prompts::PROMPT_OVERHEAD_ESTIMATE`] characters of this budget
    /// are reserved for prompt boilerplate; the remainder is the content
    /// budget handed to the chunker. Must exceed the reserve — a budget that
    /// leaves no room for content is a configuration error, rejected before
    /// any chunking happens.
    pub chunk_budget: usize,

    /// Character ceiling on the concatenated per-chunk summaries passed to
    /// the final synthesis call. Default: 20 000.
    ///
    /// The synthesis prompt has its own input limit; beyond this ceiling the
    /// summaries are truncated with a visible marker rather than risking a
    /// rejected call.
    pub synthesis_input_cap: usize,

    /// Maximum tokens the model may generate per call. Default: 4096.
    ///
    /// A dense chunk pair can produce a long `diff_sections` array. Setting
    /// this too low silently truncates the JSON mid-object, which surfaces as
    /// a chunk failure.
    pub max_tokens: usize,

    /// Pause inserted before each model call. Default: constant 1 s.
    ///
    /// Comparison calls run strictly sequentially; this keeps them from
    /// arriving as a burst. Swap in [`crate::pacing::NoPacing`] in tests.
    pub pacing: Arc<dyn RateLimitPolicy>,

    /// Optional per-chunk progress events.
    pub progress_callback: Option<Arc<dyn CompareProgressCallback>>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            generator: None,
            chunk_budget: 8000,
            synthesis_input_cap: 20_000,
            max_tokens: 4096,
            pacing: Arc::new(ConstantPacing::default()),
            progress_callback: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for CompareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("generator", &self.generator.as_ref().map(|_| "<dyn ChangeModel>"))
            .field("chunk_budget", &self.chunk_budget)
            .field("synthesis_input_cap", &self.synthesis_input_cap)
            .field("max_tokens", &self.max_tokens)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl CompareConfig {
    /// Create a new builder for `CompareConfig`.
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder {
            config: Self::default(),
        }
    }

    /// The content budget left after reserving prompt boilerplate.
    ///
    /// `None` when the configured `chunk_budget` cannot accommodate the
    /// reserve — the orchestrator turns that into
    /// [`PdfDiffError::InvalidConfig`] before chunking anything.
    pub fn effective_content_budget(&self) -> Option<usize> {
        match self.chunk_budget.saturating_sub(PROMPT_OVERHEAD_ESTIMATE) {
            0 => None,
            n => Some(n),
        }
    }
}

/// Builder for [`CompareConfig`].
pub struct CompareConfigBuilder {
    config: CompareConfig,
}

impl CompareConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn ChangeModel>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn chunk_budget(mut self, chars: usize) -> Self {
        self.config.chunk_budget = chars;
        self
    }

    pub fn synthesis_input_cap(mut self, chars: usize) -> Self {
        self.config.synthesis_input_cap = chars.max(1);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn pacing(mut self, policy: Arc<dyn RateLimitPolicy>) -> Self {
        self.config.pacing = policy;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn CompareProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CompareConfig, PdfDiffError> {
        if self.config.effective_content_budget().is_none() {
            return Err(PdfDiffError::InvalidConfig(format!(
                "chunk_budget must exceed the {PROMPT_OVERHEAD_ESTIMATE}-char prompt reserve, got {}",
                self.config.chunk_budget
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_leaves_content_room() {
        let config = CompareConfig::default();
        assert_eq!(config.effective_content_budget(), Some(6500));
    }

    #[test]
    fn builder_rejects_budget_below_reserve() {
        let result = CompareConfig::builder().chunk_budget(1500).build();
        assert!(matches!(result, Err(PdfDiffError::InvalidConfig(_))));

        let result = CompareConfig::builder().chunk_budget(0).build();
        assert!(matches!(result, Err(PdfDiffError::InvalidConfig(_))));
    }

    #[test]
    fn builder_accepts_budget_above_reserve() {
        let config = CompareConfig::builder().chunk_budget(1501).build().unwrap();
        assert_eq!(config.effective_content_budget(), Some(1));
    }

    #[test]
    fn debug_hides_dyn_fields() {
        let s = format!("{:?}", CompareConfig::default());
        assert!(s.contains("chunk_budget: 8000"));
        assert!(!s.contains("RateLimitPolicy"));
    }
}
