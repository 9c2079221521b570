//! HTML rendering of the comparison result.
//!
//! Produces a self-contained, colour-coded report from the ordered
//! [`DiffSection`] list: unchanged text in plain ink, additions on green,
//! deletions struck through on red, modifications on yellow with a hover
//! tooltip showing the original text. Because every `Modified` section
//! carries both payloads, the renderer needs no access to the source
//! documents.
//!
//! All section text is HTML-escaped before insertion; newlines become
//! `<br>` so paragraph structure survives without `<pre>` formatting.

use crate::error::PdfDiffError;
use crate::output::{CompareOutput, DiffSection};
use std::path::Path;

const REPORT_CSS: &str = r#"
    .diff-container {
        font-family: Arial, sans-serif;
        line-height: 1.6;
        padding: 20px;
        background-color: #f9f9f9;
        border-radius: 5px;
        border: 1px solid #ddd;
    }
    .diff-unchanged {
        color: #333;
    }
    .diff-added {
        background-color: #e6ffed;
        color: #22863a;
        padding: 2px 0;
        border-radius: 3px;
    }
    .diff-deleted {
        background-color: #ffeef0;
        color: #cb2431;
        text-decoration: line-through;
        padding: 2px 0;
        border-radius: 3px;
    }
    .diff-modified {
        background-color: #fff5b1;
        color: #735c0f;
        padding: 2px 0;
        border-radius: 3px;
    }
    .tooltip {
        position: relative;
        display: inline-block;
        border-bottom: 1px dotted black;
    }
    .tooltip .tooltiptext {
        visibility: hidden;
        width: 300px;
        background-color: #555;
        color: #fff;
        text-align: center;
        border-radius: 6px;
        padding: 5px;
        position: absolute;
        z-index: 1;
        bottom: 125%;
        left: 50%;
        margin-left: -150px;
        opacity: 0;
        transition: opacity 0.3s;
    }
    .tooltip:hover .tooltiptext {
        visibility: visible;
        opacity: 1;
    }
"#;

/// Render the diff sections as a styled HTML fragment.
///
/// The fragment embeds its own `<style>` block and can be written to a file
/// as-is or inserted into a larger page.
pub fn render_html(sections: &[DiffSection]) -> String {
    let mut html = String::with_capacity(1024 + sections.iter().map(|s| s.text().len()).sum::<usize>());
    html.push_str("<style>");
    html.push_str(REPORT_CSS);
    html.push_str("</style>\n<div class=\"diff-container\">\n");

    for section in sections {
        match section {
            DiffSection::Unchanged { text } => {
                html.push_str("<span class=\"diff-unchanged\">");
                html.push_str(&escape_html_breaks(text));
                html.push_str("</span>");
            }
            DiffSection::Added { text } => {
                html.push_str("<span class=\"diff-added\">");
                html.push_str(&escape_html_breaks(text));
                html.push_str("</span>");
            }
            DiffSection::Deleted { text } => {
                html.push_str("<span class=\"diff-deleted\">");
                html.push_str(&escape_html_breaks(text));
                html.push_str("</span>");
            }
            DiffSection::Modified { text, original } => {
                html.push_str("<span class=\"tooltip diff-modified\">");
                html.push_str(&escape_html_breaks(text));
                html.push_str("<span class=\"tooltiptext\">Original: ");
                html.push_str(&escape_html_breaks(original));
                html.push_str("</span></span>");
            }
        }
        html.push('\n');
    }

    html.push_str("</div>\n");
    html
}

/// Render a full report: narrative, aggregate counts, then the diff body.
pub fn render_report(output: &CompareOutput) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Document comparison</title>\n</head>\n<body>\n");

    html.push_str("<h2>Summary of changes</h2>\n<p>");
    html.push_str(&escape_html_breaks(&output.narrative));
    html.push_str("</p>\n");

    html.push_str(&format!(
        "<p><b>{}</b> additions &middot; <b>{}</b> deletions &middot; \
         <b>{}</b> modifications &middot; {} chunk(s) compared",
        output.summary.additions,
        output.summary.deletions,
        output.summary.modifications,
        output.stats.chunks_processed,
    ));
    if output.stats.chunk_errors > 0 {
        html.push_str(&format!(
            " &middot; <b>{} failed</b>",
            output.stats.chunk_errors
        ));
    }
    html.push_str("</p>\n");

    html.push_str(&render_html(&output.diff_sections));
    html.push_str("</body>\n</html>\n");
    html
}

/// Write the full HTML report to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_report(
    output: &CompareOutput,
    path: impl AsRef<Path>,
) -> Result<(), PdfDiffError> {
    let path = path.as_ref();
    let html = render_report(output);

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PdfDiffError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, &html)
        .await
        .map_err(|e| PdfDiffError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| PdfDiffError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Escape HTML metacharacters, then turn newlines into `<br>`.
fn escape_html_breaks(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '\n' => escaped.push_str("<br>"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ChangeCounts, CompareStats};

    #[test]
    fn escaping_neutralises_markup() {
        assert_eq!(
            escape_html_breaks("<script>&\"'"),
            "&lt;script&gt;&amp;&quot;&#x27;"
        );
        assert_eq!(escape_html_breaks("a\nb"), "a<br>b");
    }

    #[test]
    fn sections_map_to_css_classes() {
        let html = render_html(&[
            DiffSection::Unchanged { text: "same".into() },
            DiffSection::Added { text: "new".into() },
            DiffSection::Deleted { text: "old".into() },
            DiffSection::Modified {
                text: "now".into(),
                original: "then".into(),
            },
        ]);
        assert!(html.contains("diff-unchanged"));
        assert!(html.contains("diff-added"));
        assert!(html.contains("diff-deleted"));
        assert!(html.contains("tooltip diff-modified"));
        assert!(html.contains("Original: then"));
    }

    #[test]
    fn section_text_is_escaped() {
        let html = render_html(&[DiffSection::Added {
            text: "<b>bold</b>".into(),
        }]);
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn report_includes_narrative_and_counts() {
        let output = CompareOutput {
            diff_sections: vec![DiffSection::Unchanged { text: "x".into() }],
            summary: ChangeCounts {
                additions: 2,
                deletions: 1,
                modifications: 0,
            },
            stats: CompareStats {
                chunks_processed: 1,
                ..Default::default()
            },
            narrative: "One section was added.".into(),
        };
        let html = render_report(&output);
        assert!(html.contains("One section was added."));
        assert!(html.contains("<b>2</b> additions"));
        assert!(!html.contains("failed"));
    }

    #[tokio::test]
    async fn write_report_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        let output = CompareOutput {
            diff_sections: vec![],
            summary: ChangeCounts::default(),
            stats: CompareStats::default(),
            narrative: "No changes.".into(),
        };
        write_report(&output, &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(!path.with_extension("html.tmp").exists());
    }
}
