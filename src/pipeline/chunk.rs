//! Chunking: split a long text into bounded, paragraph-aligned pieces.
//!
//! The model has a bounded input size, so each document is cut into chunks
//! that fit the per-prompt content budget. Cuts happen only at paragraph
//! boundaries (blank lines): a paragraph carries one coherent thought, and
//! splitting it mid-way would make the model compare half-thoughts against
//! half-thoughts. The price is that a single paragraph longer than the
//! budget becomes its own oversized chunk — the call may run long, but the
//! comparison stays semantically aligned.

/// Split `text` into an ordered, materialized sequence of chunks of at most
/// `max_chunk_size` characters each.
///
/// Paragraphs are delimited by a blank line (`"\n\n"`); consecutive
/// paragraphs within a chunk are rejoined with the same separator, so a
/// single-chunk result reproduces the input text exactly. Greedy
/// accumulation: a chunk is flushed when appending the next paragraph would
/// exceed the limit. A paragraph that alone exceeds the limit is emitted as
/// one oversized chunk, never split.
///
/// Empty input yields an empty sequence. Callers are responsible for
/// rejecting a non-positive budget before calling (see
/// [`crate::config::CompareConfig::effective_content_budget`]).
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        if !current.is_empty() && current.len() + paragraph.len() > max_chunk_size {
            chunks.push(std::mem::take(&mut current));
            current.push_str(paragraph);
        } else {
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(paragraph);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
    }

    #[test]
    fn single_chunk_round_trips() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird.";
        let chunks = chunk_text(text, 1000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn rejoining_chunks_reconstructs_text() {
        let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        let chunks = chunk_text(text, 10);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join("\n\n"), text);
    }

    #[test]
    fn chunk_boundaries_fall_on_paragraphs() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        for chunk in chunk_text(text, 10) {
            assert!(
                !chunk.starts_with("\n") && !chunk.ends_with("\n"),
                "chunk straddles a paragraph boundary: {chunk:?}"
            );
        }
    }

    #[test]
    fn oversized_paragraph_is_never_split() {
        let long_para = "x".repeat(500);
        let text = format!("short\n\n{long_para}\n\ntail");
        let chunks = chunk_text(&text, 100);
        assert!(
            chunks.iter().any(|c| c == &long_para),
            "oversized paragraph must appear whole as its own chunk"
        );
    }

    #[test]
    fn greedy_accumulation_respects_limit() {
        let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        let chunks = chunk_text(text, 11);
        // "aaaa\n\nbbbb" is 10 chars; adding "cccc" would exceed 11.
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc\n\ndddd"]);
    }

    #[test]
    fn consecutive_blank_lines_survive_round_trip() {
        // Extra blank lines produce empty paragraphs; they must be
        // preserved so rejoining reconstructs the original text.
        let text = "a\n\n\n\nb";
        let chunks = chunk_text(text, 1000);
        assert_eq!(chunks.join("\n\n"), text);
    }

    #[test]
    fn whitespace_only_input_is_one_chunk() {
        let chunks = chunk_text("   ", 100);
        assert_eq!(chunks, vec!["   ".to_string()]);
    }
}
