//! Letter-level helpers built on grapheme clusters.
//!
//! A "letter" here is one extended grapheme cluster, so `e` followed by a
//! combining accent counts once and is never split by an effect.

use unicode_segmentation::UnicodeSegmentation;

/// Split a word into its letters (grapheme clusters).
#[must_use]
pub fn letters(word: &str) -> Vec<&str> {
    word.graphemes(true).collect()
}

/// Number of letters (grapheme clusters) in a word.
#[must_use]
pub fn letter_count(word: &str) -> usize {
    word.graphemes(true).count()
}

/// Whether the first character of `word` is unchanged by uppercasing.
///
/// Caseless leading characters such as punctuation or digits count as
/// uppercase, so `"...lettura"` and `"2a"` both match.
#[must_use]
pub fn starts_uppercase(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.to_uppercase().eq(std::iter::once(c)))
}

/// Uppercase the first character of `word`, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
