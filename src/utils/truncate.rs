//! Truncation Utilities
//!
//! Fits table cells and overlay lines into a character budget without
//! splitting a UTF-8 sequence.

const ELLIPSIS: char = '…';

/// Cuts `content` to at most `max_chars` characters, ending in an ellipsis
/// when anything was dropped.
pub fn truncate_text(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    // Last char boundary that leaves room for the ellipsis.
    let cut = content
        .char_indices()
        .nth(max_chars - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(content.len());

    let mut out = content[..cut].trim_end().to_string();
    out.push(ELLIPSIS);
    out
}
