/// Appended to text that was cut to fit a budget
pub const TRUNCATION_MARKER: &str = "...";

/// Cut `text` to at most `budget` characters, marker included
///
/// Text that already fits is returned verbatim. Lengths are counted in
/// Unicode scalar values so multi-byte input is never split mid-character.
pub fn truncate_with_marker(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    let keep = budget.saturating_sub(marker_len);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
