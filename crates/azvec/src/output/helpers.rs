//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to at most `max_chars` characters, ending with `...`.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a table header line, dimmed when colors are on.
pub fn header_line(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}
