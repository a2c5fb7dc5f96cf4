// Output formatting for the terminal: display of processed notifications.

pub mod terminal;

/// Shorten `text` to its first `max_chars` characters for a one-line
/// preview, marking the cut with "...".
///
/// The cut point is a char boundary found by walking `char_indices`, so
/// emoji and other multi-byte text never get split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
