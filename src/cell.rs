//! Terminal cells.
//!
//! A [`Cell`] holds one grapheme (or nothing) plus resolved colors. Wide
//! graphemes occupy one cell followed by [`CellContent::Continuation`]
//! cells so column arithmetic stays simple.

use crate::color::Rgba;
use crate::style::TextAttributes;
use crate::unicode::display_width;

/// What a cell shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CellContent {
    /// Blank (paper only).
    #[default]
    Empty,
    /// One grapheme cluster.
    Grapheme(String),
    /// Covered by the wide grapheme to its left.
    Continuation,
}

/// One terminal cell with resolved colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attributes: TextAttributes,
}

impl Cell {
    /// A grapheme drawn with the given colors.
    #[must_use]
    pub fn new(grapheme: &str, fg: Rgba, bg: Rgba) -> Self {
        Self {
            content: CellContent::Grapheme(grapheme.to_string()),
            fg,
            bg,
            attributes: TextAttributes::empty(),
        }
    }

    /// An empty cell on `bg`.
    #[must_use]
    pub fn blank(bg: Rgba) -> Self {
        Self {
            content: CellContent::Empty,
            fg: bg,
            bg,
            attributes: TextAttributes::empty(),
        }
    }

    /// Columns this cell advances the cursor by.
    #[must_use]
    pub fn display_width(&self) -> usize {
        match &self.content {
            CellContent::Empty => 1,
            CellContent::Grapheme(g) => display_width(g).max(1),
            CellContent::Continuation => 0,
        }
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }

    /// Grapheme text, or a space for empty cells.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.content {
            CellContent::Grapheme(g) => g,
            CellContent::Empty => " ",
            CellContent::Continuation => "",
        }
    }

    /// Fade the foreground towards the background.
    pub fn blend_with_opacity(&mut self, opacity: f32) {
        if opacity < 1.0 {
            self.fg = self.fg.multiply_alpha(opacity).blend_over(self.bg);
        }
    }
}
