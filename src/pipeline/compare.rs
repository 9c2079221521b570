//! Chunk comparison: drive one aligned chunk pair through the model and
//! validate the JSON response.
//!
//! This stage is intentionally thin on prompt content — wording lives in
//! [`crate::prompts`] — and thick on response handling. Models asked for
//! "only a JSON object" still wrap it in prose or fences often enough that a
//! salvage pass pays for itself, so validation runs as a ladder:
//!
//! 1. call refused outright → [`ChunkError::Blocked`] citing the reason
//! 2. response parses directly as a JSON object → accept
//! 3. response *contains* an object (first `{` … last `}`) that parses →
//!    accept, with a logged warning
//! 4. nothing parses → [`ChunkError::InvalidJson`] carrying the raw text
//! 5. parsed object missing any of `diff_sections` / `summary` /
//!    `detailed_summary` → [`ChunkError::MissingFields`]
//!
//! There are **no retries here**. A failed pair is recorded by the
//! orchestrator, which moves on to the next one; re-submission would double
//! the cost of exactly the calls most likely to fail again.

use crate::error::ChunkError;
use crate::model::ChangeModel;
use crate::output::{ChangeCounts, ChunkComparison, DiffSection};
use crate::prompts;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// The JSON shape requested from the model for one chunk pair.
#[derive(Debug, Deserialize)]
struct ChunkPayload {
    diff_sections: Vec<DiffSection>,
    summary: ChangeCounts,
    detailed_summary: String,
}

/// Compare one aligned chunk pair.
///
/// Returns the validated comparison, or a [`ChunkError`] describing why the
/// response was unusable. Either way the call never panics and never
/// propagates a transport fault — the orchestrator treats a failure as a
/// neutral contribution (zero counts, no sections) and keeps going.
pub async fn compare_chunk(
    model: &Arc<dyn ChangeModel>,
    index: usize,
    original: &str,
    modified: &str,
) -> Result<ChunkComparison, ChunkError> {
    let prompt = prompts::chunk_comparison_prompt(original, modified);
    debug!(
        "Chunk pair {}: sending comparison prompt ({} chars)",
        index + 1,
        prompt.len()
    );

    let response = model.generate_json(&prompt).await.map_err(ChunkError::from)?;
    let value = parse_response(index, &response)?;
    validate_payload(index, value, &response)
}

/// Steps 2–4 of the ladder: direct parse, then embedded-object salvage.
fn parse_response(index: usize, response: &str) -> Result<serde_json::Value, ChunkError> {
    let trimmed = response.trim();

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) if value.is_object() => return Ok(value),
        _ => {}
    }

    // The model disobeyed the format instruction; try to salvage an object
    // embedded in surrounding prose or fences.
    warn!(
        "Chunk pair {}: response was not a bare JSON object, attempting salvage",
        index + 1
    );
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&trimmed[start..=end]) {
                if value.is_object() {
                    warn!("Chunk pair {}: salvaged embedded JSON object", index + 1);
                    return Ok(value);
                }
            }
        }
    }

    Err(ChunkError::InvalidJson {
        detail: "response is not, and does not contain, a parseable JSON object".into(),
        raw: response.to_string(),
    })
}

/// Step 5: require all three fields, then deserialise into typed output.
fn validate_payload(
    index: usize,
    value: serde_json::Value,
    raw: &str,
) -> Result<ChunkComparison, ChunkError> {
    const REQUIRED: [&str; 3] = ["diff_sections", "summary", "detailed_summary"];

    let missing: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .filter(|key| value.get(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ChunkError::MissingFields {
            missing: missing.join(", "),
            raw: raw.to_string(),
        });
    }

    let payload: ChunkPayload =
        serde_json::from_value(value).map_err(|e| ChunkError::InvalidJson {
            detail: format!("response fields have unexpected shape: {e}"),
            raw: raw.to_string(),
        })?;

    debug!(
        "Chunk pair {}: {} sections, {} changes",
        index + 1,
        payload.diff_sections.len(),
        payload.summary.total()
    );

    Ok(ChunkComparison {
        sections: payload.diff_sections,
        counts: payload.summary,
        narrative: payload.detailed_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use async_trait::async_trait;

    /// Returns a fixed response string for every call.
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

    fn model(response: &str) -> Arc<dyn ChangeModel> {
        Arc::new(FixedModel(Ok(response.to_string())))
    }

    const VALID: &str = r#"{
        "diff_sections": [
            {"type": "unchanged", "text": "same"},
            {"type": "modified", "text": "now", "original": "then"}
        ],
        "summary": {"additions": 0, "deletions": 0, "modifications": 1},
        "detailed_summary": "One sentence was reworded."
    }"#;

    #[tokio::test]
    async fn valid_response_is_accepted() {
        let result = compare_chunk(&model(VALID), 0, "a", "b").await.unwrap();
        assert_eq!(result.sections.len(), 2);
        assert_eq!(result.counts.modifications, 1);
        assert_eq!(result.narrative, "One sentence was reworded.");
    }

    #[tokio::test]
    async fn embedded_object_is_salvaged() {
        let wrapped = format!("Here is the analysis you asked for:\n```json\n{VALID}\n```");
        let result = compare_chunk(&model(&wrapped), 0, "a", "b").await.unwrap();
        assert_eq!(result.counts.modifications, 1);
    }

    #[tokio::test]
    async fn prose_without_object_is_invalid_json() {
        let err = compare_chunk(&model("I cannot compare these chunks."), 0, "a", "b")
            .await
            .unwrap_err();
        match err {
            ChunkError::InvalidJson { raw, .. } => {
                assert!(raw.contains("cannot compare"));
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncated_json_is_invalid() {
        let err = compare_chunk(&model(r#"{"diff_sections": [{"type": "un"#), 0, "a", "b")
            .await
            .unwrap_err();
        assert!(matches!(err, ChunkError::InvalidJson { .. }));
    }

    #[tokio::test]
    async fn missing_fields_are_named() {
        let err = compare_chunk(
            &model(r#"{"diff_sections": [], "summary": {"additions": 0, "deletions": 0, "modifications": 0}}"#),
            0,
            "a",
            "b",
        )
        .await
        .unwrap_err();
        match err {
            ChunkError::MissingFields { missing, .. } => {
                assert_eq!(missing, "detailed_summary");
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_call_surfaces_reason() {
        let blocked: Arc<dyn ChangeModel> = Arc::new(FixedModel(Err(ModelError::Blocked {
            reason: "SAFETY".into(),
        })));
        let err = compare_chunk(&blocked, 0, "a", "b").await.unwrap_err();
        match err {
            ChunkError::Blocked { reason } => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn top_level_array_is_rejected() {
        // Parses as JSON but is not an object; salvage finds the inner
        // object-less text and fails too.
        let err = compare_chunk(&model(r#"["not", "an", "object"]"#), 0, "a", "b")
            .await
            .unwrap_err();
        assert!(matches!(err, ChunkError::InvalidJson { .. }));
    }
}
