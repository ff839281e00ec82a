//! Terminal render surface.
//!
//! Lays render units out into a [`CellBuffer`], wrapping at word
//! boundaries using each word's reserved width, so a swap inside a word
//! never moves the words after it.

use super::{RenderUnit, WordUnit};
use crate::buffer::{CellBuffer, ClipRect};
use crate::style::{Style, TextAttributes, Theme};
use crate::text::{Align, FontMetrics, Overflow, WidthUnit};
use crate::unicode::display_width;

/// Blur radius from which a letter is also drawn dim.
pub const HEAVY_BLUR: f64 = 2.0;

const TAB_STOP: u32 = 4;

/// Where a word landed.
#[derive(Clone, Copy, Debug)]
struct Placement<'u, 'a> {
    x: u32,
    y: u32,
    columns: u32,
    word: &'u WordUnit<'a>,
}

/// Wrapped, fixed-width terminal layout of a document.
#[derive(Clone, Debug)]
pub struct TextSurface {
    width: u32,
    theme: Theme,
    column_px: f32,
}

impl TextSurface {
    /// Surface `width` columns wide with the default theme and font.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width: width.max(1),
            theme: Theme::default(),
            column_px: FontMetrics::default().column_px(),
        }
    }

    /// Builder-style theme setter.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Builder-style font setter, used to convert pixel widths to columns.
    #[must_use]
    pub fn with_font(mut self, font: &FontMetrics) -> Self {
        self.column_px = font.column_px();
        self
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Draw `units` into a buffer exactly as tall as the wrapped text.
    #[must_use]
    pub fn render(&self, units: &[RenderUnit<'_>]) -> CellBuffer {
        let (placements, lines) = self.layout(units);
        let mut buffer = CellBuffer::new(self.width, lines, self.theme);
        for placement in &placements {
            draw_word(&mut buffer, placement);
        }
        buffer
    }

    /// Rendered text without styling.
    #[must_use]
    pub fn plain_text(&self, units: &[RenderUnit<'_>]) -> String {
        self.render(units).to_plain_text()
    }

    fn columns(&self, word: &WordUnit<'_>) -> u32 {
        let columns = match word.unit {
            WidthUnit::Cells => word.width,
            WidthUnit::Pixels if self.column_px > 0.0 => {
                (word.width as f32 / self.column_px).ceil() as u32
            }
            WidthUnit::Pixels => word.width,
        };
        columns.max(1)
    }

    fn layout<'u, 'a>(&self, units: &'u [RenderUnit<'a>]) -> (Vec<Placement<'u, 'a>>, u32) {
        let mut placements = Vec::new();
        let (mut x, mut y) = (0u32, 0u32);
        // Whitespace right after a soft wrap is swallowed
        let mut wrapped = false;
        for unit in units {
            match unit {
                RenderUnit::Whitespace(ws) => {
                    for c in ws.chars() {
                        match c {
                            '\n' => {
                                if !wrapped {
                                    x = 0;
                                    y += 1;
                                }
                                wrapped = false;
                            }
                            '\r' => {}
                            _ if wrapped => {}
                            '\t' => x += TAB_STOP - x % TAB_STOP,
                            _ => x += display_width(c.encode_utf8(&mut [0; 4])) as u32,
                        }
                    }
                }
                RenderUnit::Word(word) => {
                    let columns = self.columns(word);
                    if x > 0 && x + columns > self.width {
                        x = 0;
                        y += 1;
                    }
                    placements.push(Placement {
                        x,
                        y,
                        columns,
                        word,
                    });
                    x += columns;
                    wrapped = x >= self.width;
                    if wrapped {
                        x = 0;
                        y += 1;
                    }
                }
            }
        }
        let lines = if x == 0 && y > 0 { y } else { y + 1 };
        (placements, lines)
    }
}

fn draw_word(buffer: &mut CellBuffer, placement: &Placement<'_, '_>) {
    let word = placement.word;
    let layout = word.layout();
    let text_width = display_width(&word.text()) as u32;
    let offset = match layout.align {
        Align::Center => placement.columns.saturating_sub(text_width) / 2,
        Align::Left => 0,
    };
    let clip = layout.overflow == Overflow::Clip;
    if clip {
        buffer.push_scissor(ClipRect::new(placement.x, placement.y, placement.columns, 1));
    }

    let (x, y) = (placement.x + offset, placement.y);
    match word.glyphs() {
        Some(glyphs) => {
            let mut col = x;
            for glyph in glyphs {
                col += match glyph.blur {
                    Some(blur) => {
                        let mut style = Style::NONE;
                        if blur.radius >= HEAVY_BLUR {
                            style = style.with_attributes(TextAttributes::DIM);
                        }
                        buffer.push_opacity(blur.opacity as f32);
                        let columns = buffer.draw_grapheme(col, y, &glyph.text, style);
                        buffer.pop_opacity();
                        columns
                    }
                    None => buffer.draw_grapheme(col, y, &glyph.text, Style::NONE),
                };
            }
        }
        None => {
            buffer.draw_text(x, y, &word.text(), Style::NONE);
        }
    }

    if clip {
        buffer.pop_scissor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::dictionary::SubstitutionDictionary;
    use crate::render::render_units;
    use crate::text::{
        Blur, CellMeasurer, Glyph, Layout, MonospaceMeasurer, Segmenter, TokenRegistry,
    };

    fn registry(text: &str) -> TokenRegistry {
        let dictionary = SubstitutionDictionary::builtin();
        let font = FontMetrics::default();
        let mut registry = TokenRegistry::new();
        registry.rebuild(
            Segmenter::new(&dictionary, &font).segment(text, &mut CellMeasurer::default()),
        );
        registry
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let reg = registry("La lettura è difficile");
        let text = TextSurface::new(12).plain_text(&render_units(&reg));
        insta::assert_snapshot!(text, @r"
        La lettura è
        difficile
        ");
    }

    #[test]
    fn hard_newlines_are_kept() {
        let reg = registry("uno\n\ndue");
        let buffer = TextSurface::new(20).render(&render_units(&reg));
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.to_plain_text(), "uno\n\ndue");
    }

    #[test]
    fn words_are_centered_in_reserved_width() {
        // "Meglio" reserves the width of "Migliorare"
        let reg = registry("Meglio tardi");
        let text = TextSurface::new(40).plain_text(&render_units(&reg));
        assert_eq!(text, "  Meglio   tardi");
    }

    #[test]
    fn swapped_word_is_left_aligned_and_clipped() {
        let mut reg = registry("Meglio tardi");
        reg.set_text(0, "Migliorare!!".to_string());
        reg.set_layout(0, Layout {
            align: Align::Left,
            overflow: Overflow::Clip,
        });
        let text = TextSurface::new(40).plain_text(&render_units(&reg));
        assert_eq!(text, "Migliorare tardi");
    }

    #[test]
    fn reserved_width_keeps_neighbours_still() {
        let mut reg = registry("La lettura è difficile");
        let surface = TextSurface::new(80);
        let before = surface.plain_text(&render_units(&reg));
        reg.set_text(2, "lettore".to_string());
        let after = surface.plain_text(&render_units(&reg));
        assert_eq!(before.find('è'), after.find('è'));
        assert_eq!(before.find("difficile"), after.find("difficile"));
    }

    #[test]
    fn heavy_blur_is_dim_and_faded() {
        let mut reg = registry("casa");
        reg.set_glyphs(0, vec![
            Glyph::sharp("c"),
            Glyph {
                text: "a".to_string(),
                blur: Some(Blur {
                    radius: 3.0,
                    opacity: 0.6,
                }),
            },
            Glyph {
                text: "s".to_string(),
                blur: Some(Blur {
                    radius: 1.0,
                    opacity: 0.6,
                }),
            },
            Glyph::sharp("a"),
        ]);
        let theme = Theme {
            ink: Rgba::BLACK,
            paper: Rgba::WHITE,
        };
        let buffer = TextSurface::new(10)
            .with_theme(theme)
            .render(&render_units(&reg));
        assert_eq!(buffer.to_plain_text(), "casa");

        let heavy = buffer.get(1, 0).unwrap();
        assert!(heavy.attributes.contains(TextAttributes::DIM));
        assert!(heavy.fg.r > 0.0);
        let light = buffer.get(2, 0).unwrap();
        assert!(!light.attributes.contains(TextAttributes::DIM));
        assert!(light.fg.r > 0.0);
        assert_eq!(buffer.get(0, 0).unwrap().fg, Rgba::BLACK);
    }

    #[test]
    fn pixel_widths_convert_to_columns() {
        let dictionary = SubstitutionDictionary::new();
        let font = FontMetrics::default();
        let mut reg = TokenRegistry::new();
        reg.rebuild(
            Segmenter::new(&dictionary, &font)
                .segment("ciao mondo", &mut MonospaceMeasurer::default()),
        );
        let surface = TextSurface::new(40).with_font(&font);
        let text = surface.plain_text(&render_units(&reg));
        assert_eq!(text.split_whitespace().collect::<Vec<_>>(), ["ciao", "mondo"]);
        assert!(text.len() < 14);
    }
}
