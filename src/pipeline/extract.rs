//! Text extraction from PDF files.
//!
//! Extraction failures are not errors here. A scanned, image-only PDF is a
//! perfectly valid input whose *text* cannot be recovered without OCR; the
//! comparison pipeline treats the fixed sentinel returned in that case as
//! ordinary document text, so the rest of the run still completes and the
//! failure is visible in the output rather than aborting it. Callers that
//! want to special-case the sentinel can compare against
//! [`EXTRACTION_FAILURE_SENTINEL`].

use std::path::Path;
use tracing::{debug, error};

/// Returned in place of extracted text when no text could be recovered.
///
/// Deliberately ordinary prose, not an error value: downstream the sentinel
/// flows through chunking and comparison like any other text.
pub const EXTRACTION_FAILURE_SENTINEL: &str =
    "ERROR: Could not extract text from the PDF. It may be a scanned document requiring OCR.";

/// Extract plain text from the PDF at `path`.
///
/// Never fails: an unreadable or text-free PDF yields
/// [`EXTRACTION_FAILURE_SENTINEL`] with the reason logged. Extraction is
/// synchronous and CPU-bound — call via `spawn_blocking` from async code
/// (as [`crate::compare::compare_files`] does).
pub fn extract_text(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                error!("No text recovered from {}", path.display());
                EXTRACTION_FAILURE_SENTINEL.to_string()
            } else {
                debug!(
                    "Extracted {} chars from {}",
                    text.len(),
                    path.display()
                );
                text
            }
        }
        Err(e) => {
            error!("Text extraction failed for {}: {}", path.display(), e);
            EXTRACTION_FAILURE_SENTINEL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_file_yields_sentinel() {
        let text = extract_text(Path::new("/definitely/not/a/real/file.pdf"));
        assert_eq!(text, EXTRACTION_FAILURE_SENTINEL);
    }

    #[test]
    fn sentinel_is_ordinary_text() {
        // The sentinel must survive the normal pipeline path: it chunks like
        // any other single-paragraph document.
        let chunks = crate::pipeline::chunk::chunk_text(EXTRACTION_FAILURE_SENTINEL, 6500);
        assert_eq!(chunks, vec![EXTRACTION_FAILURE_SENTINEL.to_string()]);
    }
}
