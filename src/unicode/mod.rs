//! Unicode utilities for letters, display width and key normalization.

mod grapheme;
mod normalize;
mod width;

pub use grapheme::{capitalize_first, letter_count, letters, starts_uppercase};
pub use normalize::{PUNCTUATION, normalize_key, normalize_nfc};
pub use width::{WidthMethod, display_width, display_width_with_method};
