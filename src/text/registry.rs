//! Token registry: immutable originals plus their current displays.

use crate::text::measure::WidthUnit;
use crate::text::segment::{Segmentation, Token};
use std::borrow::Cow;

/// Horizontal placement of a word inside its reserved width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Center,
    Left,
}

/// What happens to text wider than its reserved width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Visible,
    Clip,
}

/// Layout attributes of a word unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub align: Align,
    pub overflow: Overflow,
}

/// Blur applied to one letter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blur {
    /// Blur radius (in the render surface's length unit).
    pub radius: f64,
    /// Letter opacity in `[0, 1]`.
    pub opacity: f64,
}

/// One rendered letter.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub blur: Option<Blur>,
}

impl Glyph {
    /// An unblurred letter.
    #[must_use]
    pub fn sharp(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blur: None,
        }
    }
}

/// What a word currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DisplayContent {
    /// The token's original text.
    #[default]
    Original,
    /// Replacement text.
    Text(String),
    /// Per-letter rendering (blur animation frames).
    Glyphs(Vec<Glyph>),
}

/// Current display state of one token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenDisplay {
    pub content: DisplayContent,
    pub layout: Layout,
}

/// Ordered tokens of the current input with their displays.
///
/// The token list is only replaced wholesale by [`TokenRegistry::rebuild`];
/// effects write displays but never add or remove tokens.
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    displays: Vec<TokenDisplay>,
    unit: WidthUnit,
    generation: u64,
    writes: u64,
}

impl TokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every token with a fresh segmentation.
    pub fn rebuild(&mut self, segmentation: Segmentation) {
        self.displays = vec![TokenDisplay::default(); segmentation.tokens.len()];
        self.tokens = segmentation.tokens;
        self.unit = segmentation.unit;
        self.generation += 1;
    }

    /// Drop all tokens.
    pub fn clear(&mut self) {
        self.rebuild(Segmentation::default());
    }

    /// Incremented on every rebuild.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total display writes since creation.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Unit of every token's display width.
    #[must_use]
    pub fn unit(&self) -> WidthUnit {
        self.unit
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Word tokens with their registry index.
    pub fn words(&self) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is_word())
    }

    /// Original text of token `index`.
    #[must_use]
    pub fn original(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(Token::text)
    }

    #[must_use]
    pub fn display(&self, index: usize) -> Option<&TokenDisplay> {
        self.displays.get(index)
    }

    /// Plain text currently shown for token `index`.
    #[must_use]
    pub fn displayed_text(&self, index: usize) -> Option<Cow<'_, str>> {
        let token = self.tokens.get(index)?;
        let text = match &self.displays[index].content {
            DisplayContent::Original => Cow::Borrowed(token.text()),
            DisplayContent::Text(text) => Cow::Borrowed(text.as_str()),
            DisplayContent::Glyphs(glyphs) => {
                Cow::Owned(glyphs.iter().map(|g| g.text.as_str()).collect())
            }
        };
        Some(text)
    }

    /// Whole displayed document as plain text.
    #[must_use]
    pub fn displayed_document(&self) -> String {
        (0..self.tokens.len())
            .filter_map(|i| self.displayed_text(i))
            .collect()
    }

    /// Whether token `index` shows exactly its original, unstyled.
    #[must_use]
    pub fn is_restored(&self, index: usize) -> bool {
        self.displays.get(index).is_some_and(|display| {
            display.layout == Layout::default()
                && match &display.content {
                    DisplayContent::Original => true,
                    DisplayContent::Text(text) => text == self.tokens[index].text(),
                    DisplayContent::Glyphs(glyphs) => {
                        glyphs.iter().all(|g| g.blur.is_none())
                            && glyphs.iter().map(|g| g.text.as_str()).eq(
                                crate::unicode::letters(self.tokens[index].text()).into_iter(),
                            )
                    }
                }
        })
    }

    /// Whether every token shows its original.
    #[must_use]
    pub fn all_restored(&self) -> bool {
        (0..self.tokens.len()).all(|i| self.is_restored(i))
    }

    /// Show `text` in place of word `index`.
    pub fn set_text(&mut self, index: usize, text: String) {
        if let Some(display) = self.word_display_mut(index) {
            display.content = DisplayContent::Text(text);
            self.writes += 1;
        }
    }

    /// Show per-letter glyphs for word `index`.
    pub fn set_glyphs(&mut self, index: usize, glyphs: Vec<Glyph>) {
        if let Some(display) = self.word_display_mut(index) {
            display.content = DisplayContent::Glyphs(glyphs);
            self.writes += 1;
        }
    }

    /// Override the layout of word `index`.
    pub fn set_layout(&mut self, index: usize, layout: Layout) {
        if let Some(display) = self.word_display_mut(index) {
            display.layout = layout;
            self.writes += 1;
        }
    }

    /// Put token `index` back to its original text and default layout.
    pub fn restore(&mut self, index: usize) {
        if let Some(display) = self.displays.get_mut(index) {
            *display = TokenDisplay::default();
            self.writes += 1;
        }
    }

    /// Restore every token.
    pub fn restore_all(&mut self) {
        for display in &mut self.displays {
            *display = TokenDisplay::default();
        }
        self.writes += 1;
    }

    fn word_display_mut(&mut self, index: usize) -> Option<&mut TokenDisplay> {
        match self.tokens.get(index) {
            Some(token) if token.is_word() => self.displays.get_mut(index),
            _ => None,
        }
    }
}
