//! UTF-8-safe truncation, shared by the context assembler and the agent
//! loop's `max_observe` byte cap.

/// Truncates `text` to at most `max_bytes`, backing off to the nearest
/// preceding char boundary so a multi-byte character is never split.
pub fn truncate_bytes(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut boundary = max_bytes;
    while boundary > 0 && !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    let mut truncated = text[..boundary].to_string();
    truncated.push_str("... [truncated]");
    truncated
}
