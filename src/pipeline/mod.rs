//! Pipeline stages for LLM-based document comparison.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ normalize ──▶ chunk ──▶ compare ──▶ synthesize
//! (pdf text)  (cleanup)   (split)    (LLM JSON)  (LLM prose)
//! ```
//!
//! 1. [`extract`]    — pull plain text out of a PDF; runs in
//!    `spawn_blocking` because extraction is CPU-bound and not async
//! 2. [`normalize`]  — deterministic text-cleanup rules so paragraph
//!    boundaries are well-formed before chunking
//! 3. [`chunk`]      — split text into bounded, paragraph-aligned chunks
//! 4. [`compare`]    — drive one chunk pair through the model and validate
//!    the JSON response; one of the two stages with network I/O
//! 5. [`synthesize`] — the second-pass model call that folds all per-chunk
//!    narratives into one
//!
//! The stages are wired together by [`crate::compare`], which owns pairing,
//! aggregation, and failure accounting.

pub mod chunk;
pub mod compare;
pub mod extract;
pub mod normalize;
pub mod synthesize;
