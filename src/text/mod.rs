//! Text segmentation, measurement and the token registry.
//!
//! Key types:
//!
//! - [`Segmenter`]: splits input into word and whitespace [`Token`]s and
//!   reserves a stable width for each word
//! - [`TextMeasurer`]: injectable width measurement, scoped per pass by
//!   [`MeasureSurface`]
//! - [`TokenRegistry`]: the segmented tokens plus what each one currently
//!   displays
//!
//! # Examples
//!
//! ```
//! use dyslexia_sim::dictionary::SubstitutionDictionary;
//! use dyslexia_sim::text::{CellMeasurer, FontMetrics, Segmenter, TokenRegistry};
//!
//! let dictionary = SubstitutionDictionary::builtin();
//! let font = FontMetrics::default();
//! let mut measurer = CellMeasurer::default();
//!
//! let mut registry = TokenRegistry::new();
//! registry.rebuild(Segmenter::new(&dictionary, &font).segment("La lettura", &mut measurer));
//!
//! assert_eq!(registry.len(), 3);
//! assert_eq!(registry.original(2), Some("lettura"));
//! assert_eq!(registry.token(2).unwrap().display_width(), 7);
//! ```

mod measure;
mod registry;
mod segment;

pub use measure::{
    CellMeasurer, FontMetrics, MeasureSurface, MonospaceMeasurer, TextMeasurer, WidthUnit,
};
pub use registry::{
    Align, Blur, DisplayContent, Glyph, Layout, Overflow, TokenDisplay, TokenRegistry,
};
pub use segment::{Segmentation, Segmenter, Token, TokenKind, match_capitalization};
