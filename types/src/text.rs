//! Small pure text helpers.

/// Truncate `s` and append `suffix` if it exceeds `threshold` characters.
fn truncate_core(s: &str, threshold: usize, take: usize, suffix: &str) -> String {
    if s.chars().count() <= threshold {
        return s.to_string();
    }
    let head: String = s.chars().take(take).collect();
    format!("{head}{suffix}")
}

/// Truncate a string to a maximum length, adding `...` if needed.
///
/// - Trims surrounding whitespace before truncating.
/// - Uses `char` count (not bytes) to avoid splitting Unicode scalar values.
/// - Enforces a minimum `max` of 3 so the ellipsis fits.
#[must_use]
pub fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    let max = max.max(3);
    let take = max.saturating_sub(3);
    truncate_core(raw.trim(), max, take, "...")
}

/// Keep text up to the first '.', re-terminated with a single period.
///
/// Text without a period gets one appended.
#[must_use]
pub fn first_sentence(raw: &str) -> String {
    let head = raw.split('.').next().unwrap_or_default().trim();
    format!("{head}.")
}

/// Uppercase the first character (Unicode-aware).
#[must_use]
pub fn capitalize_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
