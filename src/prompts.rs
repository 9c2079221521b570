//! Prompts for LLM-based document comparison.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the requested JSON schema or the
//!    synthesis instructions requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    calling a real model, so prompt regressions are easy to catch.

use crate::output::ChangeCounts;

/// Characters reserved out of the configured chunk budget for prompt
/// boilerplate: the instruction text and JSON-format template wrapped around
/// each chunk pair. The orchestrator subtracts this before chunking so a full
/// prompt stays within the model's input limit.
pub const PROMPT_OVERHEAD_ESTIMATE: usize = 1500;

/// Build the comparison prompt for one aligned chunk pair.
///
/// Asks for a single JSON object with exactly three fields —
/// `diff_sections`, `summary`, `detailed_summary` — matching the types in
/// [`crate::output`]. The response is validated (and salvaged if necessary)
/// by [`crate::pipeline::compare`].
pub fn chunk_comparison_prompt(original: &str, modified: &str) -> String {
    format!(
        r#"You are a document comparison expert tasked with analyzing *one specific chunk* of a document.
Compare the original chunk text to the modified chunk text and identify additions, deletions, and modifications *only within this chunk*.

Original document chunk:
{original}

Modified document chunk:
{modified}

Provide your analysis *only* as a single JSON object in the following format. Do not include any introductory text or markdown formatting like ```json.

{{
    "diff_sections": [
        {{"type": "unchanged", "text": "Unchanged text within the chunk"}},
        {{"type": "added", "text": "Text added within the modified chunk"}},
        {{"type": "deleted", "text": "Text deleted from the original chunk"}},
        {{"type": "modified", "text": "Modified text in this chunk", "original": "Original version in this chunk"}}
    ],
    "summary": {{
        "additions": 0,
        "deletions": 0,
        "modifications": 0
    }},
    "detailed_summary": "A brief human-readable summary of the key changes *identified strictly within this specific chunk*"
}}
**Strictly follow the JSON format above. Do not include any other text or explanations.**
Focus *only* on the differences between the two provided chunks. Ensure the output is a single, valid JSON object."#
    )
}

/// Build the final synthesis prompt from aggregate counts and the
/// concatenated (possibly truncated) per-chunk summaries.
///
/// The instructions forbid internal process vocabulary so the narrative reads
/// as a single comparison, and ask the model to flag degraded confidence when
/// error notes appear among the summaries. The failure list itself is
/// prepended by the orchestrator, not here.
pub fn synthesis_prompt(counts: &ChangeCounts, chunk_summaries: &str) -> String {
    format!(
        r#"You are an expert analyst summarizing document changes. You have been provided with the results of a chunk-by-chunk comparison between two versions of a document.

Overall Change Counts:
- Additions: {additions} significant blocks/changes noted.
- Deletions: {deletions} significant blocks/changes noted.
- Modifications: {modifications} significant blocks/changes noted.

Chunk-level Summaries and Error Notes:
--- START CHUNK SUMMARIES ---
{chunk_summaries}
--- END CHUNK SUMMARIES ---

Based *only* on the information above, generate a single, cohesive, human-readable summary of the *overall* key changes between the original and modified documents. Focus on the most significant differences.
- Do NOT mention the word "chunk" or the chunking process in your final summary.
- Synthesize the findings into a unified narrative.
- If errors were noted during chunk processing, briefly mention that some parts might be missing or inaccurate due to processing errors.
- Be concise yet informative."#,
        additions = counts.additions,
        deletions = counts.deletions,
        modifications = counts.modifications,
    )
}
