//! Summary synthesis: fold all per-chunk narratives into one.
//!
//! The second of the two model-calling stages. Given the aggregate counts
//! and the concatenated per-chunk summaries, ask the model for a single
//! cohesive narrative phrased as if one comparison had been made — the
//! chunking is an implementation detail the reader should never see.
//!
//! Failure here is soft: a synthesis that errors or comes back empty returns
//! `None`, the reason is logged, and the orchestrator falls back to
//! presenting the raw per-chunk summaries instead of silently losing
//! information.

use crate::model::ChangeModel;
use crate::output::ChangeCounts;
use crate::prompts;
use std::sync::Arc;
use tracing::{info, warn};

/// Ask the model for one overall narrative.
///
/// `combined` is the `"\n---\n"`-joined (and possibly truncated) sequence of
/// per-chunk summaries, in chunk order. Returns `None` when no usable
/// narrative was obtained.
pub async fn synthesize_summary(
    model: &Arc<dyn ChangeModel>,
    counts: &ChangeCounts,
    combined: &str,
) -> Option<String> {
    let prompt = prompts::synthesis_prompt(counts, combined);
    info!(
        "Synthesizing final summary ({} chars of chunk summaries)",
        combined.len()
    );

    match model.generate_text(&prompt).await {
        Ok(text) if !text.trim().is_empty() => {
            info!("Successfully synthesized final summary");
            Some(text)
        }
        Ok(_) => {
            warn!("Summary synthesis returned empty text");
            None
        }
        Err(e) => {
            warn!("Summary synthesis failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use async_trait::async_trait;

    struct FixedModel(Result<String, ModelError>);

    #[async_trait]
    impl ChangeModel for FixedModel {
        async fn generate_text(&self, _prompt: &str) -> Result<String, ModelError> {
            self.0.clone()
        }

        async fn generate_json(&self, _prompt: &str) -> Result<String, ModelError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn non_empty_response_is_returned() {
        let model: Arc<dyn ChangeModel> =
            Arc::new(FixedModel(Ok("The document gained a section.".into())));
        let result =
            synthesize_summary(&model, &ChangeCounts::default(), "summary one").await;
        assert_eq!(result.as_deref(), Some("The document gained a section."));
    }

    #[tokio::test]
    async fn empty_response_signals_failure() {
        let model: Arc<dyn ChangeModel> = Arc::new(FixedModel(Ok("   \n".into())));
        assert!(
            synthesize_summary(&model, &ChangeCounts::default(), "summary")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn transport_error_signals_failure() {
        let model: Arc<dyn ChangeModel> = Arc::new(FixedModel(Err(ModelError::Transport {
            message: "503".into(),
        })));
        assert!(
            synthesize_summary(&model, &ChangeCounts::default(), "summary")
                .await
                .is_none()
        );
    }
}
