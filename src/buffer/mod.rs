//! Cell grid the terminal surface draws into.
//!
//! [`CellBuffer`] is a fixed-size grid of [`Cell`]s with a scissor stack
//! (used to clip overflowing words) and an opacity stack (used to fade
//! blurred letters towards the paper color).
//!
//! # Examples
//!
//! ```
//! use dyslexia_sim::buffer::{CellBuffer, ClipRect};
//! use dyslexia_sim::{Style, Theme};
//!
//! let mut buf = CellBuffer::new(10, 1, Theme::default());
//! buf.push_scissor(ClipRect::new(0, 0, 4, 1));
//! buf.draw_text(0, 0, "lettera", Style::NONE);
//! buf.pop_scissor();
//! assert_eq!(buf.to_plain_text(), "lett");
//! ```

mod opacity;
mod scissor;

pub use opacity::OpacityStack;
pub use scissor::{ClipRect, ScissorStack};

use crate::cell::{Cell, CellContent};
use crate::style::{Style, Theme};
use crate::unicode::display_width;
use unicode_segmentation::UnicodeSegmentation;

/// Fixed-size grid of cells.
#[derive(Clone, Debug)]
pub struct CellBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    theme: Theme,
    scissor_stack: ScissorStack,
    opacity_stack: OpacityStack,
}

impl CellBuffer {
    /// Blank buffer painted with the theme's paper color. Zero dimensions
    /// are clamped to 1.
    #[must_use]
    pub fn new(width: u32, height: u32, theme: Theme) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::blank(theme.paper); size],
            theme,
            scissor_stack: ScissorStack::new(),
            opacity_stack: OpacityStack::new(),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Reset every cell to blank paper and drop all clips and fades.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank(self.theme.paper));
        self.scissor_stack.clear();
        self.opacity_stack.clear();
    }

    pub fn push_scissor(&mut self, rect: ClipRect) {
        self.scissor_stack.push(rect);
    }

    pub fn pop_scissor(&mut self) {
        self.scissor_stack.pop();
    }

    pub fn push_opacity(&mut self, opacity: f32) {
        self.opacity_stack.push(opacity);
    }

    pub fn pop_opacity(&mut self) {
        self.opacity_stack.pop();
    }

    #[must_use]
    pub fn current_opacity(&self) -> f32 {
        self.opacity_stack.current()
    }

    /// Draw one grapheme at (`x`, `y`) and return the columns it spans.
    ///
    /// Wide graphemes are drawn only if every column they cover is visible;
    /// the columns are reported either way so callers keep their place.
    pub fn draw_grapheme(&mut self, x: u32, y: u32, grapheme: &str, style: Style) -> u32 {
        let columns = display_width(grapheme) as u32;
        if columns == 0 {
            return 0;
        }
        let visible = (x..x.saturating_add(columns))
            .all(|cx| self.index(cx, y).is_some() && self.scissor_stack.contains(cx, y));
        if !visible {
            return columns;
        }

        let (fg, bg) = self.theme.resolve(style);
        let mut cell = Cell::new(grapheme, fg, bg);
        cell.attributes = style.attributes;
        cell.blend_with_opacity(self.opacity_stack.current());
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
        for cx in x + 1..x + columns {
            if let Some(i) = self.index(cx, y) {
                self.cells[i] = Cell {
                    content: CellContent::Continuation,
                    ..Cell::blank(bg)
                };
            }
        }
        columns
    }

    /// Draw `text` left to right from (`x`, `y`) and return the columns used.
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, style: Style) -> u32 {
        let mut col = x;
        for grapheme in text.graphemes(true) {
            col = col.saturating_add(self.draw_grapheme(col, y, grapheme, style));
        }
        col - x
    }

    /// Buffer contents as text, one line per row, trailing blanks trimmed.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<String> = self
            .rows()
            .map(|row| {
                let line: String = row.iter().map(Cell::text).collect();
                line.trim_end().to_string()
            })
            .collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}
