//! Error types for the pdf2diff library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`PdfDiffError`] — **Fatal**: the comparison cannot proceed at all
//!   (bad input file, invalid chunk budget, provider not configured).
//!   Returned as `Err(PdfDiffError)` from the top-level `compare*` functions.
//!
//! * [`ChunkError`] — **Non-fatal**: a single chunk pair failed (blocked
//!   call, unparseable response) but all other pairs are fine. Tallied into
//!   [`crate::output::CompareStats::chunk_errors`] and surfaced in the final
//!   narrative's warning preamble so callers can inspect partial success
//!   rather than losing the whole comparison to one bad pair.
//!
//! * [`ModelError`] — a single failed call to the generation capability.
//!   Folded into `ChunkError` by the chunk comparator and into a logged
//!   fallback by the synthesizer; it never crosses the orchestrator boundary.
//!
//! The separation lets callers decide their own tolerance: treat any chunk
//! failure as an error via [`crate::output::CompareOutput::into_result`], or
//! accept the partial result and read the warning preamble.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2diff library.
///
/// Per-chunk failures use [`ChunkError`] and are folded into
/// [`crate::output::CompareOutput`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PdfDiffError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Some chunk pairs succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::CompareOutput::into_result`] when the
    /// caller wants to treat any chunk failure as an error.
    #[error("{failed}/{total} chunk pairs failed during comparison")]
    PartialFailure { failed: usize, total: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or pre-flight validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single chunk pair.
///
/// Every variant means the same thing to the orchestrator: the pair
/// contributes zero counts and no real diff sections, one entry to the
/// failure tally, and its `Display` text to the warning preamble. Variants
/// exist for logging and diagnostics only — callers never branch on them.
#[derive(Debug, Clone, Error)]
pub enum ChunkError {
    /// The service rejected the request outright (no candidate content).
    #[error("API call blocked: {reason}")]
    Blocked { reason: String },

    /// Transport-level failure (network error, 5xx, timeout).
    #[error("LLM call failed: {detail}")]
    Transport { detail: String },

    /// The service returned an empty response body.
    #[error("Received empty response from the LLM")]
    EmptyResponse,

    /// Response text was not a JSON object, even after salvage.
    #[error("Invalid JSON response: {detail}")]
    InvalidJson {
        detail: String,
        /// Raw response text, retained for diagnostics.
        raw: String,
    },

    /// Response parsed as JSON but lacked one or more required fields.
    #[error("Response JSON missing required field(s): {missing}")]
    MissingFields { missing: String, raw: String },
}

impl ChunkError {
    /// Raw response text, when the failure preserved one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ChunkError::InvalidJson { raw, .. } | ChunkError::MissingFields { raw, .. } => {
                Some(raw)
            }
            _ => None,
        }
    }
}

/// A single failed call to the generation capability.
///
/// Produced by [`crate::model::ChangeModel`] implementations; never surfaced
/// to library callers directly.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The request was refused by the service (safety block, content filter).
    #[error("request blocked: {reason}")]
    Blocked { reason: String },

    /// Anything else that prevented a response: network, auth, 5xx.
    #[error("{message}")]
    Transport { message: String },

    /// The call succeeded but the response carried no text.
    #[error("empty response")]
    Empty,
}

impl From<ModelError> for ChunkError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Blocked { reason } => ChunkError::Blocked { reason },
            ModelError::Transport { message } => ChunkError::Transport { detail: message },
            ModelError::Empty => ChunkError::EmptyResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display() {
        let e = PdfDiffError::PartialFailure {
            failed: 1,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("1/10"), "got: {msg}");
    }

    #[test]
    fn invalid_config_display() {
        let e = PdfDiffError::InvalidConfig("chunk budget too small".into());
        assert!(e.to_string().contains("chunk budget too small"));
    }

    #[test]
    fn blocked_chunk_error_display() {
        let e = ChunkError::Blocked {
            reason: "SAFETY".into(),
        };
        assert_eq!(e.to_string(), "API call blocked: SAFETY");
    }

    #[test]
    fn invalid_json_retains_raw() {
        let e = ChunkError::InvalidJson {
            detail: "expected object".into(),
            raw: "I cannot help with that".into(),
        };
        assert_eq!(e.raw_response(), Some("I cannot help with that"));
    }

    #[test]
    fn blocked_model_error_folds_into_chunk_error() {
        let e: ChunkError = ModelError::Blocked {
            reason: "filtered".into(),
        }
        .into();
        assert!(matches!(e, ChunkError::Blocked { .. }));
        assert!(e.raw_response().is_none());
    }
}
