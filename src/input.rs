//! Input resolution: normalise the two user-supplied paths or URLs to local
//! PDF files.
//!
//! ## Why download to a temp file?
//!
//! The text extractor works on file paths, not byte streams. Downloading a
//! URL input into a `TempDir` gives it a path to open while ensuring cleanup
//! happens automatically when the [`ResolvedInput`] is dropped, even if the
//! process panics. Both paths — local and downloaded — go through the same
//! `%PDF` magic-byte validation so callers get a meaningful error rather
//! than nonsense extraction output from an HTML error page or a renamed
//! Word document.

use crate::error::PdfDiffError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// A comparison input normalised to a local PDF file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the PDF now lives in a temp directory that is
    /// removed when this value is dropped.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF, wherever it came from.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve one input string — local file path or HTTP/HTTPS URL — to a
/// local, magic-validated PDF file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, PdfDiffError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

fn resolve_local(path_str: &str) -> Result<ResolvedInput, PdfDiffError> {
    let path = PathBuf::from(path_str);

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfDiffError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfDiffError::FileNotFound { path });
        }
    };

    let mut magic = [0u8; 4];
    {
        use std::io::Read;
        if file.read_exact(&mut magic).is_err() {
            // Shorter than four bytes; definitely not a PDF.
            return Err(PdfDiffError::NotAPdf { path, magic });
        }
    }
    validate_magic(&path, magic)?;

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, PdfDiffError> {
    info!("Downloading PDF from: {}", url);

    let download_failed = |reason: String| PdfDiffError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| download_failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            PdfDiffError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            download_failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(download_failed(format!("HTTP {}", response.status())));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| download_failed(e.to_string()))?;

    let temp_dir = TempDir::new().map_err(|e| PdfDiffError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename_from_url(url));

    let mut magic = [0u8; 4];
    magic.copy_from_slice(bytes.get(..4).unwrap_or(b"\0\0\0\0"));
    validate_magic(&file_path, magic)?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| PdfDiffError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

fn validate_magic(path: &Path, magic: [u8; 4]) -> Result<(), PdfDiffError> {
    if &magic == b"%PDF" {
        Ok(())
    } else {
        Err(PdfDiffError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        })
    }
}

/// Pick a filename for the downloaded file from the last URL path segment.
fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed.path_segments().and_then(|mut segments| {
                segments
                    .next_back()
                    .filter(|last| !last.is_empty() && last.contains('.'))
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/papers/v2.pdf"),
            "v2.pdf"
        );
        assert_eq!(filename_from_url("https://example.com/"), "downloaded.pdf");
        assert_eq!(filename_from_url("not a url"), "downloaded.pdf");
    }

    #[test]
    fn missing_file_is_rejected() {
        let result = resolve_local("/definitely/not/a/real/file.pdf");
        assert!(matches!(result, Err(PdfDiffError::FileNotFound { .. })));
    }

    #[test]
    fn non_pdf_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"<html>not a pdf</html>").unwrap();
        let result = resolve_local(f.path().to_str().unwrap());
        assert!(matches!(result, Err(PdfDiffError::NotAPdf { .. })));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();
        let result = resolve_local(f.path().to_str().unwrap());
        assert!(matches!(result, Err(PdfDiffError::NotAPdf { .. })));
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n...").unwrap();
        let resolved = resolve_local(f.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved.path(), f.path());
    }
}
