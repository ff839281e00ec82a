//! Buffered ANSI output writer with state tracking.

use crate::ansi::{self, ColorMode};
use crate::buffer::CellBuffer;
use crate::cell::Cell;
use crate::color::Rgba;
use crate::style::TextAttributes;
use std::io::{self, Write};

/// Buffered writer that tracks SGR state to minimize escape sequences.
pub struct AnsiWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    color_mode: ColorMode,

    // Current state for delta encoding
    current_fg: Option<Rgba>,
    current_bg: Option<Rgba>,
    current_attrs: TextAttributes,
}

impl<W: Write> AnsiWriter<W> {
    /// Writer emitting true color.
    pub fn new(writer: W) -> Self {
        Self::with_color_mode(writer, ColorMode::TrueColor)
    }

    pub fn with_color_mode(writer: W, color_mode: ColorMode) -> Self {
        Self {
            writer,
            buffer: Vec::with_capacity(8192),
            color_mode,
            current_fg: None,
            current_bg: None,
            current_attrs: TextAttributes::empty(),
        }
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Forget tracked state so the next cell re-emits everything.
    pub fn reset_state(&mut self) {
        self.current_fg = None;
        self.current_bg = None;
        self.current_attrs = TextAttributes::empty();
    }

    pub fn write_str(&mut self, s: &str) {
        self.buffer.extend_from_slice(s.as_bytes());
    }

    /// Set foreground color if different from current.
    pub fn set_fg(&mut self, color: Rgba) {
        if self.current_fg != Some(color) {
            let _ = ansi::write_fg_color_with_mode(&mut self.buffer, color, self.color_mode);
            self.current_fg = Some(color);
        }
    }

    /// Set background color if different from current.
    pub fn set_bg(&mut self, color: Rgba) {
        if self.current_bg != Some(color) {
            let _ = ansi::write_bg_color_with_mode(&mut self.buffer, color, self.color_mode);
            self.current_bg = Some(color);
        }
    }

    /// Set text attributes, only writing changes.
    pub fn set_attributes(&mut self, attrs: TextAttributes) {
        if self.current_attrs == attrs {
            return;
        }
        let removed = self.current_attrs - attrs;
        if !removed.is_empty() {
            let _ = ansi::write_sgr(&mut self.buffer, removed.sgr_off());
            // Bold and dim share a reset, so re-enable whichever survives
            self.current_attrs -= removed;
            if removed.intersects(TextAttributes::BOLD | TextAttributes::DIM) {
                self.current_attrs -= TextAttributes::BOLD | TextAttributes::DIM;
            }
        }
        let added = attrs - self.current_attrs;
        if !added.is_empty() {
            let _ = ansi::write_attributes(&mut self.buffer, added);
        }
        self.current_attrs = attrs;
    }

    /// Write a cell at the cursor.
    pub fn write_cell(&mut self, cell: &Cell) {
        if cell.is_continuation() {
            return;
        }
        self.set_attributes(cell.attributes);
        self.set_fg(cell.fg);
        self.set_bg(cell.bg);
        self.write_str(cell.text());
    }

    /// Queue a whole frame: home the cursor and write every row.
    pub fn write_frame(&mut self, frame: &CellBuffer) {
        self.write_str(ansi::sync::BEGIN);
        self.write_str(ansi::CURSOR_HOME);
        for (row, cells) in frame.rows().enumerate() {
            let _ = ansi::write_cursor_position(&mut self.buffer, row as u32, 0);
            for cell in cells {
                self.write_cell(cell);
            }
        }
        self.write_str(ansi::RESET);
        self.reset_state();
        self.write_str(ansi::sync::END);
    }

    /// Flush buffered output to the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.buffer)?;
        self.buffer.clear();
        self.writer.flush()
    }

    /// Queued bytes not yet flushed.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
