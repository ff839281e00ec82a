//! Dictionary key normalization.

use unicode_normalization::UnicodeNormalization;

/// Punctuation stripped from a word before dictionary lookup.
pub const PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Normalize `text` to NFC (canonical composition).
#[must_use]
pub fn normalize_nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Build the lookup key for a word: NFC, lowercase, punctuation removed.
///
/// Only the characters in [`PUNCTUATION`] are removed, wherever they occur,
/// so `"parole,"` and `"pa.role"` both map to `"parole"`.
#[must_use]
pub fn normalize_key(word: &str) -> String {
    word.nfc()
        .flat_map(char::to_lowercase)
        .filter(|c| !PUNCTUATION.contains(c))
        .collect()
}
