//! Slug normalization used to derive stable space identifiers.
//!
//! Slugs keep Unicode letters and digits (lowercased) and collapse every other
//! run of characters into a single `-`. They are never truncated, so two names
//! share a slug only when they differ in case or punctuation.

/// Normalizes user input into a slug of lowercase letters, digits and `-`.
/// Returns `None` when the normalized result is empty or shorter than `min` characters.
pub(crate) fn normalize_slug(input: &str, min: usize) -> Option<String> {
    let mut slug = String::new();
    let mut prev_dash = false;
    for ch in input.trim().to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let normalized = slug.trim_matches('-');
    if normalized.is_empty() || normalized.chars().count() < min {
        return None;
    }
    Some(normalized.to_string())
}
