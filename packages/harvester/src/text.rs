//! Text sanitization shared by the normalizers.
//!
//! Strips markdown emphasis, links-to-text, and HTML tags; collapses
//! whitespace; truncates on char boundaries with a trailing ellipsis.

use regex::Regex;

/// Compiled sanitization patterns. Build once per normalizer.
pub struct Sanitizer {
    patterns: Vec<(Regex, &'static str)>,
    whitespace: Regex,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        let patterns = [
            (r"\*\*(.+?)\*\*", "$1"),        // bold
            (r"\*(.+?)\*", "$1"),            // italic
            (r"~~(.+?)~~", "$1"),            // strikethrough
            (r"`(.+?)`", "$1"),              // inline code
            (r"\[(.+?)\]\(.+?\)", "$1"),     // links to their text
            (r"(?m)^#+\s*", ""),             // headers
            (r"(?m)^>\s*", ""),              // block quotes
            (r"(?m)^[*\-]\s+", ""),          // list markers
            (r"<[^>]+>", ""),                // HTML tags
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            // Patterns are fixed literals; compilation cannot fail.
            (Regex::new(pattern).expect("valid sanitizer pattern"), replacement)
        })
        .collect();
        Self {
            patterns,
            whitespace: Regex::new(r"\s+").expect("valid whitespace pattern"),
        }
    }

    /// Strip markup and collapse runs of whitespace to single spaces.
    pub fn sanitize(&self, content: &str) -> String {
        let mut text = content.to_string();
        for (pattern, replacement) in &self.patterns {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }
}

/// Truncate to at most `max_bytes`, appending `...` when cut. The cut
/// lands on a char boundary and the ellipsis fits inside the budget.
pub fn truncate_with_ellipsis(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut end = max_bytes.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate to at most `max_chars` characters, appending `...` when cut
/// (the ellipsis counts toward the budget). Used for caption titles.
pub fn truncate_chars_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
