//! Output types: diff sections, change counts, and the aggregate result.
//!
//! The comparison result is deliberately an explicit tagged type at every
//! layer — a chunk comparison either succeeded (sections + counts +
//! narrative) or failed ([`crate::error::ChunkError`]); there is no
//! success-shaped value with an error field hidden inside it. Callers branch
//! once, at the type level, and can then trust every field they read.
//!
//! [`DiffSection`] serialises to the wire format the chunk-comparison prompt
//! requests from the model (`{"type": "modified", "text": …, "original": …}`),
//! so the comparator can deserialise the model's `diff_sections` array
//! directly into the same type the renderer consumes.

use serde::{Deserialize, Serialize};

/// One classified span of text in the merged comparison.
///
/// Order within a sequence is significant: it reconstructs the reading order
/// of the merged document. Sections are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffSection {
    /// Text present in both versions, unchanged.
    Unchanged { text: String },
    /// Text present only in the modified version.
    Added { text: String },
    /// Text present only in the original version.
    Deleted { text: String },
    /// Text rewritten between versions. Carries both payloads so a renderer
    /// can show the replacement alongside what it replaced.
    Modified { text: String, original: String },
}

impl DiffSection {
    /// The section's primary text payload.
    pub fn text(&self) -> &str {
        match self {
            DiffSection::Unchanged { text }
            | DiffSection::Added { text }
            | DiffSection::Deleted { text }
            | DiffSection::Modified { text, .. } => text,
        }
    }

    /// The original text a [`DiffSection::Modified`] section replaces.
    pub fn original(&self) -> Option<&str> {
        match self {
            DiffSection::Modified { original, .. } => Some(original),
            _ => None,
        }
    }
}

/// Addition/deletion/modification counts, local to one chunk pair or
/// aggregated across the whole comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub additions: u64,
    pub deletions: u64,
    pub modifications: u64,
}

impl ChangeCounts {
    /// Accumulate another set of counts into this one.
    pub fn merge(&mut self, other: ChangeCounts) {
        self.additions += other.additions;
        self.deletions += other.deletions;
        self.modifications += other.modifications;
    }

    /// Total number of recorded changes of any kind.
    pub fn total(&self) -> u64 {
        self.additions + self.deletions + self.modifications
    }
}

/// A successful comparison of one aligned chunk pair.
///
/// Produced by [`crate::pipeline::compare::compare_chunk`]; ownership of the
/// sections transfers to the orchestrator's accumulated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkComparison {
    /// Typed diff spans for this pair, in reading order.
    pub sections: Vec<DiffSection>,
    /// Change counts local to this pair.
    pub counts: ChangeCounts,
    /// Short narrative restricted to this pair; input to the final synthesis.
    pub narrative: String,
}

/// Chunk-level bookkeeping for the whole comparison.
///
/// Wall-clock durations are deliberately absent: given identical inputs and a
/// deterministic model the serialised output must be byte-identical, so
/// timings go to the log instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareStats {
    /// Aligned chunk pairs actually sent to the model.
    pub chunks_processed: usize,
    /// Leftover chunks classified wholesale as added.
    pub chunks_added: usize,
    /// Leftover chunks classified wholesale as deleted.
    pub chunks_deleted: usize,
    /// Chunk pairs whose comparison failed.
    pub chunk_errors: usize,
}

/// The pipeline's final output: the full ordered diff, aggregate counts,
/// chunk bookkeeping, and the synthesized narrative.
///
/// The shape is identical for full success and partial failure — only the
/// content differs (`stats.chunk_errors` and the narrative's warning
/// preamble), so callers can render uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOutput {
    /// All diff sections: aligned pairs in index order, then leftover
    /// added/deleted chunks in ascending index order, never interleaved.
    pub diff_sections: Vec<DiffSection>,
    /// Aggregate change counts across every chunk.
    pub summary: ChangeCounts,
    /// Chunk-level bookkeeping.
    pub stats: CompareStats,
    /// Synthesized overall narrative (warning-prefixed when chunks failed).
    pub narrative: String,
}

impl CompareOutput {
    /// `true` when every aligned chunk pair compared without error.
    pub fn is_complete(&self) -> bool {
        self.stats.chunk_errors == 0
    }

    /// Treat any chunk failure as an error.
    ///
    /// Returns `Err(PdfDiffError::PartialFailure)` when one or more chunk
    /// pairs failed, for callers that do not want to inspect partial results.
    pub fn into_result(self) -> Result<Self, crate::error::PdfDiffError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(crate::error::PdfDiffError::PartialFailure {
                failed: self.stats.chunk_errors,
                total: self.stats.chunks_processed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_section_wire_format() {
        let json = serde_json::to_value(DiffSection::Modified {
            text: "new".into(),
            original: "old".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "modified");
        assert_eq!(json["text"], "new");
        assert_eq!(json["original"], "old");
    }

    #[test]
    fn diff_section_deserialises_model_output() {
        let sections: Vec<DiffSection> = serde_json::from_str(
            r#"[
                {"type": "unchanged", "text": "same"},
                {"type": "added", "text": "new paragraph"},
                {"type": "deleted", "text": "gone"},
                {"type": "modified", "text": "now", "original": "then"}
            ]"#,
        )
        .unwrap();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[1].text(), "new paragraph");
        assert_eq!(sections[3].original(), Some("then"));
    }

    #[test]
    fn counts_merge() {
        let mut total = ChangeCounts::default();
        total.merge(ChangeCounts {
            additions: 2,
            deletions: 1,
            modifications: 3,
        });
        total.merge(ChangeCounts {
            additions: 1,
            ..Default::default()
        });
        assert_eq!(total.additions, 3);
        assert_eq!(total.deletions, 1);
        assert_eq!(total.modifications, 3);
        assert_eq!(total.total(), 7);
    }

    #[test]
    fn into_result_rejects_partial_failure() {
        let output = CompareOutput {
            diff_sections: vec![],
            summary: ChangeCounts::default(),
            stats: CompareStats {
                chunks_processed: 4,
                chunk_errors: 1,
                ..Default::default()
            },
            narrative: String::new(),
        };
        assert!(!output.is_complete());
        assert!(matches!(
            output.into_result(),
            Err(crate::error::PdfDiffError::PartialFailure {
                failed: 1,
                total: 4
            })
        ));
    }

    #[test]
    fn into_result_passes_complete_output() {
        let output = CompareOutput {
            diff_sections: vec![DiffSection::Unchanged { text: "x".into() }],
            summary: ChangeCounts::default(),
            stats: CompareStats::default(),
            narrative: "No changes.".into(),
        };
        assert!(output.into_result().is_ok());
    }
}
