//! Render units and the surfaces that draw them.
//!
//! [`render_units`] turns the token registry into the sequence the outside
//! world renders: literal whitespace, or a word unit carrying its current
//! display, reserved width and original text. Two surfaces consume it:
//!
//! - [`markup`]: span markup with inline width and blur styles
//! - [`TextSurface`]: a wrapped terminal cell grid

pub mod markup;
mod surface;

pub use markup::{escape_html, to_markup, word_markup};
pub use surface::{HEAVY_BLUR, TextSurface};

use crate::text::{DisplayContent, Glyph, Layout, TokenDisplay, TokenKind, TokenRegistry, WidthUnit};
use std::borrow::Cow;

/// A styled word ready for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordUnit<'a> {
    /// Registry index of the token.
    pub index: usize,
    /// Immutable original text.
    pub original: &'a str,
    /// Reserved width, in `unit`.
    pub width: u32,
    pub unit: WidthUnit,
    pub display: &'a TokenDisplay,
}

impl<'a> WordUnit<'a> {
    /// Plain text currently shown.
    #[must_use]
    pub fn text(&self) -> Cow<'a, str> {
        match &self.display.content {
            DisplayContent::Original => Cow::Borrowed(self.original),
            DisplayContent::Text(text) => Cow::Borrowed(text.as_str()),
            DisplayContent::Glyphs(glyphs) => {
                Cow::Owned(glyphs.iter().map(|g| g.text.as_str()).collect())
            }
        }
    }

    /// Per-letter glyphs, when the display is a blur frame.
    #[must_use]
    pub fn glyphs(&self) -> Option<&'a [Glyph]> {
        match &self.display.content {
            DisplayContent::Glyphs(glyphs) => Some(glyphs),
            _ => None,
        }
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.display.layout
    }
}

/// One renderable piece of the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderUnit<'a> {
    Whitespace(&'a str),
    Word(WordUnit<'a>),
}

/// Render units for every token, in document order.
#[must_use]
pub fn render_units(registry: &TokenRegistry) -> Vec<RenderUnit<'_>> {
    registry
        .tokens()
        .iter()
        .enumerate()
        .filter_map(|(index, token)| match token.kind() {
            TokenKind::Whitespace => Some(RenderUnit::Whitespace(token.text())),
            TokenKind::Word => registry.display(index).map(|display| {
                RenderUnit::Word(WordUnit {
                    index,
                    original: token.text(),
                    width: token.display_width(),
                    unit: registry.unit(),
                    display,
                })
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::SubstitutionDictionary;
    use crate::text::{CellMeasurer, FontMetrics, Segmenter};

    #[test]
    fn units_follow_token_order() {
        let dictionary = SubstitutionDictionary::builtin();
        let font = FontMetrics::default();
        let mut registry = TokenRegistry::new();
        registry.rebuild(
            Segmenter::new(&dictionary, &font)
                .segment("La  lettura", &mut CellMeasurer::default()),
        );
        registry.set_text(2, "lettore".to_string());

        let units = render_units(&registry);
        assert_eq!(units.len(), 3);
        assert_eq!(units[1], RenderUnit::Whitespace("  "));
        let RenderUnit::Word(word) = units[2] else {
            panic!("expected a word unit");
        };
        assert_eq!(word.index, 2);
        assert_eq!(word.original, "lettura");
        assert_eq!(word.text(), "lettore");
        assert_eq!(word.width, 7);
        assert!(word.glyphs().is_none());
    }
}
