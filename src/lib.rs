//! # pdf2diff
//!
//! Compare two versions of a PDF document and produce a colour-coded
//! semantic diff with a narrative summary, using LLMs.
//!
//! ## Why this crate?
//!
//! Algorithmic diff tools (LCS, Myers) work on bytes and lines; on two
//! versions of a *document* they drown the reader in reflowed-line noise and
//! say nothing about meaning. Instead this crate hands aligned pieces of
//! both versions to a language model and asks for a classified diff —
//! unchanged / added / deleted / modified spans — plus a short narrative of
//! what actually changed.
//!
//! The hard part is that models have a bounded input size and documents do
//! not. The pipeline chunks both versions at paragraph boundaries, compares
//! chunk pairs one at a time, absorbs per-chunk failures without aborting,
//! classifies surplus chunks wholesale when the versions differ in length,
//! and then runs a second synthesis pass that folds the per-chunk
//! narratives into a single summary.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF A, PDF B
//!  │
//!  ├─ 1. Input      resolve local files or download from URLs
//!  ├─ 2. Extract    pull plain text out of each PDF (spawn_blocking)
//!  ├─ 3. Normalize  deterministic cleanup of extractor quirks
//!  ├─ 4. Chunk      paragraph-aligned splitting under the prompt budget
//!  ├─ 5. Compare    sequential LLM calls, one aligned chunk pair each
//!  ├─ 6. Synthesize one LLM call folding all chunk narratives into one
//!  └─ 7. Output     ordered diff sections + counts + narrative (+ HTML)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2diff::{compare_files, CompareConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = CompareConfig::default();
//!     let output = compare_files("contract_v1.pdf", "contract_v2.pdf", &config).await?;
//!     println!("{}", output.narrative);
//!     eprintln!(
//!         "{} additions, {} deletions, {} modifications",
//!         output.summary.additions,
//!         output.summary.deletions,
//!         output.summary.modifications
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2diff` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2diff = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Fatal errors (bad input, invalid chunk budget, no provider) return
//! [`PdfDiffError`]. A failed chunk pair is *not* fatal: it contributes a
//! visible marker section and a note in the narrative's warning preamble,
//! and `stats.chunk_errors` counts it. Callers that prefer all-or-nothing
//! semantics can use [`CompareOutput::into_result`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod compare;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod pacing;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use compare::{compare, compare_files, compare_sync, ChunkPair};
pub use config::{CompareConfig, CompareConfigBuilder};
pub use error::{ChunkError, ModelError, PdfDiffError};
pub use model::{ChangeModel, ProviderModel};
pub use output::{ChangeCounts, ChunkComparison, CompareOutput, CompareStats, DiffSection};
pub use pacing::{ConstantPacing, NoPacing, RateLimitPolicy};
pub use progress::{CompareProgressCallback, NoopProgressCallback, ProgressCallback};
pub use render::{render_html, render_report, write_report};
