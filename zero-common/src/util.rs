//! Text utilities shared by Zero services.

/// Split a string after `max_chars` characters.
///
/// Returns `None` when the string already fits. Otherwise returns the kept
/// prefix and the number of characters that were cut. Works on character
/// boundaries, so multi-byte UTF-8 (emoji, CJK) is never split.
pub fn split_at_chars(s: &str, max_chars: usize) -> Option<(&str, usize)> {
    let (idx, _) = s.char_indices().nth(max_chars)?;
    let kept = &s[..idx];
    let removed = s[idx..].chars().count();
    Some((kept, removed))
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match split_at_chars(s, max_chars) {
        Some((kept, _)) => format!("{kept}..."),
        None => s.to_string(),
    }
}

/// Truncate a string to at most `max_chars` characters, appending a marker
/// that records how many characters were dropped.
pub fn truncate_with_marker(s: &str, max_chars: usize) -> String {
    match split_at_chars(s, max_chars) {
        Some((kept, removed)) => format!("{kept}... [truncated {removed} chars]"),
        None => s.to_string(),
    }
}
