//! Comparison entry points and the chunk-pair orchestrator.
//!
//! ## Shape of the pipeline
//!
//! Both documents are chunked independently, then chunk `i` of the original
//! is compared against chunk `i` of the modified document. Pairs run
//! **strictly sequentially, in index order** — no concurrent model calls.
//! Sequential dispatch respects provider rate limits on long documents and
//! makes the output fully deterministic: ordering is index-based throughout,
//! so identical inputs and a deterministic model yield byte-identical
//! results.
//!
//! When the documents produce unequal chunk counts the surplus chunks on
//! either side are classified wholesale — Added when the modified document
//! is longer, Deleted when the original is — and appended after all aligned
//! pairs, in ascending index order. Each leftover chunk counts as exactly
//! one addition or deletion regardless of its size; a coarse but stable
//! contract.
//!
//! One pair's failure never aborts the run. The failed pair contributes a
//! synthetic marker section and a failure note, and processing continues;
//! the final narrative is prefixed with a warning block enumerating every
//! failure so the caller is never silently handed an incomplete result.

use crate::config::CompareConfig;
use crate::error::PdfDiffError;
use crate::input;
use crate::model::resolve_model;
use crate::output::{ChangeCounts, CompareOutput, CompareStats, DiffSection};
use crate::pipeline::{chunk, compare as chunk_compare, extract, normalize, synthesize};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Separator between per-chunk summaries in the synthesis input.
const SUMMARY_SEPARATOR: &str = "\n---\n";

/// Appended when the synthesis input is cut at the configured ceiling.
const TRUNCATION_MARKER: &str = "\n... [Summaries truncated due to length]";

/// Narrative used when chunking produced nothing to summarize.
const NO_SUMMARIES_NARRATIVE: &str =
    "No specific changes were identified or summarized during chunk processing.";

/// An index-aligned pairing of chunks from the two documents.
///
/// Absence on one side with presence on the other forces the pair's
/// classification — Added (modified side only) or Deleted (original side
/// only) — instead of a content comparison; such chunks never reach the
/// model. Both sides absent cannot be produced by [`ChunkPair::align`].
#[derive(Debug, Clone, Copy)]
pub struct ChunkPair<'a> {
    /// Position in both chunk sequences.
    pub index: usize,
    /// Chunk text from the original document, if it has a chunk at `index`.
    pub original: Option<&'a str>,
    /// Chunk text from the modified document, if it has a chunk at `index`.
    pub modified: Option<&'a str>,
}

impl<'a> ChunkPair<'a> {
    /// Pair two chunk sequences index-wise, covering the longer of the two.
    pub fn align(original: &'a [String], modified: &'a [String]) -> Vec<ChunkPair<'a>> {
        (0..original.len().max(modified.len()))
            .map(|index| ChunkPair {
                index,
                original: original.get(index).map(String::as_str),
                modified: modified.get(index).map(String::as_str),
            })
            .collect()
    }
}

/// Compare two document texts.
///
/// This is the primary entry point for the library. `original` and
/// `modified` are the full extracted texts of the two document versions.
///
/// # Returns
/// `Ok(CompareOutput)` on success, even if some chunk pairs failed
/// (check `output.stats.chunk_errors`, or use
/// [`CompareOutput::into_result`]).
///
/// # Errors
/// Returns `Err(PdfDiffError)` only for fatal errors:
/// - Chunk budget too small to fit any content next to the prompt
/// - No LLM provider configured
pub async fn compare(
    original: &str,
    modified: &str,
    config: &CompareConfig,
) -> Result<CompareOutput, PdfDiffError> {
    let total_start = Instant::now();

    // ── Step 1: Validate the content budget ──────────────────────────────
    let content_budget = config.effective_content_budget().ok_or_else(|| {
        PdfDiffError::InvalidConfig(format!(
            "chunk_budget {} is too small to accommodate the {}-char prompt reserve",
            config.chunk_budget,
            crate::prompts::PROMPT_OVERHEAD_ESTIMATE
        ))
    })?;
    info!(
        "Starting comparison. Max chunk content size: {} chars.",
        content_budget
    );

    // ── Step 2: Chunk both documents ─────────────────────────────────────
    let chunks_a = chunk::chunk_text(original, content_budget);
    let chunks_b = chunk::chunk_text(modified, content_budget);
    info!("Original document split into {} chunks.", chunks_a.len());
    info!("Modified document split into {} chunks.", chunks_b.len());

    // ── Step 3: Short-circuit when there is nothing to compare ───────────
    if chunks_a.is_empty() && chunks_b.is_empty() {
        warn!("Both input texts resulted in zero chunks.");
        return Ok(CompareOutput {
            diff_sections: vec![DiffSection::Unchanged {
                text: String::new(),
            }],
            summary: ChangeCounts::default(),
            stats: CompareStats::default(),
            narrative: "Both documents appear to be empty.".to_string(),
        });
    }

    // ── Step 4: Resolve the generation capability ────────────────────────
    let model = resolve_model(config)?;

    // Append-only accumulators, owned solely by this function. No other
    // component mutates them; each loop iteration only appends.
    let mut diff_sections: Vec<DiffSection> = Vec::new();
    let mut totals = ChangeCounts::default();
    let mut chunk_summaries: Vec<String> = Vec::new();
    let mut failures: Vec<String> = Vec::new();
    let mut stats = CompareStats::default();

    let pairs = ChunkPair::align(&chunks_a, &chunks_b);
    let total_chunks = pairs.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_compare_start(total_chunks);
    }

    // ── Step 5: Work through the pairs, strictly sequentially ────────────
    info!(
        "Comparing {} aligned chunk pairs sequentially.",
        chunks_a.len().min(chunks_b.len())
    );
    let llm_start = Instant::now();

    for pair in &pairs {
        let chunk_num = pair.index + 1;
        match (pair.original, pair.modified) {
            // Both documents have a chunk at this index: compare content.
            (Some(original_chunk), Some(modified_chunk)) => {
                info!("Processing chunk pair {} of {}...", chunk_num, total_chunks);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_chunk_start(chunk_num, total_chunks);
                }
                stats.chunks_processed += 1;

                config.pacing.pause().await;
                match chunk_compare::compare_chunk(
                    &model,
                    pair.index,
                    original_chunk,
                    modified_chunk,
                )
                .await
                {
                    Ok(comparison) => {
                        if let Some(ref cb) = config.progress_callback {
                            cb.on_chunk_complete(
                                chunk_num,
                                total_chunks,
                                comparison.sections.len(),
                            );
                        }
                        diff_sections.extend(comparison.sections);
                        totals.merge(comparison.counts);
                        if !comparison.narrative.is_empty() {
                            chunk_summaries.push(comparison.narrative);
                        }
                    }
                    Err(e) => {
                        error!("Error processing chunk pair {}: {}", chunk_num, e);
                        if let Some(raw) = e.raw_response() {
                            debug!("Chunk pair {} raw response: {}", chunk_num, raw);
                        }
                        if let Some(ref cb) = config.progress_callback {
                            cb.on_chunk_error(chunk_num, total_chunks, &e.to_string());
                        }
                        failures.push(format!("Chunk {}: {}", chunk_num, e));
                        // A synthetic unchanged section keeps the failure
                        // visible in the rendered diff without resembling a
                        // real content change.
                        diff_sections.push(DiffSection::Unchanged {
                            text: format!("\n\n[ERROR PROCESSING CHUNK {}: {}]\n\n", chunk_num, e),
                        });
                        chunk_summaries
                            .push(format!("[Error processing chunk {}: {}]", chunk_num, e));
                    }
                }
            }
            // Only the modified document reaches this index: wholesale add.
            (None, Some(added_chunk)) => {
                info!("Processing chunk {} (added)...", chunk_num);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_chunk_leftover(chunk_num, total_chunks, true);
                }
                diff_sections.push(DiffSection::Added {
                    text: added_chunk.to_string(),
                });
                chunk_summaries.push(format!(
                    "Chunk {}: This entire chunk was added.",
                    chunk_num
                ));
                totals.additions += 1;
                stats.chunks_added += 1;
            }
            // Only the original document reaches this index: wholesale delete.
            (Some(deleted_chunk), None) => {
                info!("Processing chunk {} (deleted)...", chunk_num);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_chunk_leftover(chunk_num, total_chunks, false);
                }
                diff_sections.push(DiffSection::Deleted {
                    text: deleted_chunk.to_string(),
                });
                chunk_summaries.push(format!(
                    "Chunk {}: This entire chunk was deleted.",
                    chunk_num
                ));
                totals.deletions += 1;
                stats.chunks_deleted += 1;
            }
            // align() never produces an index both sequences lack.
            (None, None) => continue,
        }
    }

    stats.chunk_errors = failures.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_compare_complete(total_chunks, failures.len());
    }

    // ── Step 6: Synthesize the final narrative ───────────────────────────
    let mut narrative = if chunk_summaries.is_empty() {
        info!("No chunk summaries available to synthesize.");
        NO_SUMMARIES_NARRATIVE.to_string()
    } else {
        let combined = cap_synthesis_input(
            chunk_summaries.join(SUMMARY_SEPARATOR),
            config.synthesis_input_cap,
        );
        config.pacing.pause().await;
        match synthesize::synthesize_summary(&model, &totals, &combined).await {
            Some(synthesized) => synthesized,
            None => {
                warn!(
                    "Final summary synthesis failed or returned empty. \
                     Falling back to concatenated chunk summaries."
                );
                format!("Synthesis Failed. Raw Chunk Summaries:\n---\n{combined}")
            }
        }
    };

    // ── Step 7: Prepend a warning block when chunks failed ───────────────
    if !failures.is_empty() {
        narrative = format!(
            "**Note:** Errors occurred during the processing of {} chunk(s). \
             The comparison or summary below might be incomplete or inaccurate \
             in affected areas.\nError Details:\n- {}\n\n---\n\n{}",
            failures.len(),
            failures.join("\n- "),
            narrative
        );
    }

    info!(
        "Aggregation and synthesis complete: {} pairs, {} failures, {}ms model time, {}ms total",
        stats.chunks_processed,
        failures.len(),
        llm_start.elapsed().as_millis(),
        total_start.elapsed().as_millis()
    );

    // ── Step 8: Assemble the aggregate result ────────────────────────────
    Ok(CompareOutput {
        diff_sections,
        summary: totals,
        stats,
        narrative,
    })
}

/// Compare two PDF files or URLs.
///
/// Resolves each input (local path or HTTP/HTTPS URL), extracts and
/// normalizes its text, then delegates to [`compare`]. Extraction failures
/// are not fatal: an unextractable PDF contributes a fixed sentinel string
/// that flows through the comparison like ordinary text (see
/// [`extract::EXTRACTION_FAILURE_SENTINEL`]).
pub async fn compare_files(
    original_input: impl AsRef<str>,
    modified_input: impl AsRef<str>,
    config: &CompareConfig,
) -> Result<CompareOutput, PdfDiffError> {
    let resolved_a =
        input::resolve_input(original_input.as_ref(), config.download_timeout_secs).await?;
    let resolved_b =
        input::resolve_input(modified_input.as_ref(), config.download_timeout_secs).await?;

    // Extraction is CPU-bound and not async-safe; keep it off the executor.
    let path_a = resolved_a.path().to_path_buf();
    let text_a = tokio::task::spawn_blocking(move || extract::extract_text(&path_a))
        .await
        .map_err(|e| PdfDiffError::Internal(format!("extraction task panicked: {e}")))?;

    let path_b = resolved_b.path().to_path_buf();
    let text_b = tokio::task::spawn_blocking(move || extract::extract_text(&path_b))
        .await
        .map_err(|e| PdfDiffError::Internal(format!("extraction task panicked: {e}")))?;

    let text_a = normalize::normalize_text(&text_a);
    let text_b = normalize::normalize_text(&text_b);

    compare(&text_a, &text_b, config).await
}

/// Synchronous wrapper around [`compare`].
///
/// Creates a temporary tokio runtime internally.
pub fn compare_sync(
    original: &str,
    modified: &str,
    config: &CompareConfig,
) -> Result<CompareOutput, PdfDiffError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PdfDiffError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(compare(original, modified, config))
}

/// Cap the concatenated summaries at `ceiling` characters.
///
/// Counts characters rather than bytes so the cut can never land inside a
/// UTF-8 sequence. The marker makes the truncation visible to both the
/// synthesis model and anyone reading the fallback narrative.
fn cap_synthesis_input(combined: String, ceiling: usize) -> String {
    let char_count = combined.chars().count();
    if char_count <= ceiling {
        return combined;
    }
    warn!(
        "Concatenated chunk summaries length ({char_count}) exceeds synthesis \
         input limit ({ceiling}). Truncating."
    );
    let mut capped: String = combined.chars().take(ceiling).collect();
    capped.push_str(TRUNCATION_MARKER);
    capped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_covers_the_longer_sequence() {
        let a = vec!["a0".to_string(), "a1".to_string()];
        let b = vec!["b0".to_string(), "b1".to_string(), "b2".to_string()];
        let pairs = ChunkPair::align(&a, &b);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].original, Some("a0"));
        assert_eq!(pairs[0].modified, Some("b0"));
        assert_eq!(pairs[2].original, None);
        assert_eq!(pairs[2].modified, Some("b2"));
        assert_eq!(pairs[2].index, 2);
    }

    #[test]
    fn align_of_empty_sequences_is_empty() {
        let pairs = ChunkPair::align(&[], &[]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn cap_leaves_short_input_alone() {
        let s = "short summary".to_string();
        assert_eq!(cap_synthesis_input(s.clone(), 100), s);
    }

    #[test]
    fn cap_truncates_and_marks_long_input() {
        let capped = cap_synthesis_input("abcdefghij".to_string(), 4);
        assert_eq!(capped, format!("abcd{TRUNCATION_MARKER}"));
    }

    #[test]
    fn cap_counts_characters_not_bytes() {
        // Four multi-byte characters fit a ceiling of four.
        let s = "éééé".to_string();
        assert_eq!(cap_synthesis_input(s.clone(), 4), s);
        let capped = cap_synthesis_input("ééééé".to_string(), 4);
        assert!(capped.starts_with("éééé"));
        assert!(capped.ends_with(TRUNCATION_MARKER));
    }
}
