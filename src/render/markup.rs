//! Span markup output.
//!
//! Every word becomes a `span.word` that carries its original text and
//! index and pins its width, so swaps never move neighbouring words.
//! Blurred letters are wrapped in inner spans with a CSS blur filter.
//!
//! ```
//! use dyslexia_sim::render::{render_units, to_markup};
//! use dyslexia_sim::{EngineConfig, Simulator};
//!
//! let mut sim = Simulator::new(EngineConfig::default())?;
//! sim.set_text("Ciao a tutti");
//! let html = to_markup(&render_units(sim.registry()));
//! assert!(html.starts_with(r#"<span class="word" data-original="Ciao" data-index="0""#));
//! # Ok::<(), dyslexia_sim::Error>(())
//! ```

use super::{RenderUnit, WordUnit};
use crate::text::{Align, DisplayContent, Overflow};
use std::fmt::Write;

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for a whole document.
#[must_use]
pub fn to_markup(units: &[RenderUnit<'_>]) -> String {
    let mut out = String::new();
    for unit in units {
        match unit {
            RenderUnit::Whitespace(ws) => out.push_str(&escape_html(ws)),
            RenderUnit::Word(word) => out.push_str(&word_markup(word)),
        }
    }
    out
}

/// Markup for one word.
#[must_use]
pub fn word_markup(word: &WordUnit<'_>) -> String {
    let suffix = word.unit.css_suffix();
    let mut style = format!(
        "min-width: {w}{suffix}; width: {w}{suffix};",
        w = word.width
    );
    let layout = word.layout();
    if layout.align == Align::Left {
        style.push_str(" text-align: left;");
    }
    if layout.overflow == Overflow::Clip {
        style.push_str(" overflow: hidden;");
    }

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<span class="word" data-original="{}" data-index="{}" style="{style}">"#,
        escape_html(word.original),
        word.index,
    );
    match &word.display.content {
        DisplayContent::Original => out.push_str(&escape_html(word.original)),
        DisplayContent::Text(text) => out.push_str(&escape_html(text)),
        DisplayContent::Glyphs(glyphs) => {
            for glyph in glyphs {
                let letter = escape_html(&glyph.text);
                match glyph.blur {
                    Some(blur) => {
                        let _ = write!(
                            out,
                            r#"<span style="filter: blur({}px); opacity: {};">{letter}</span>"#,
                            css_number(blur.radius),
                            css_number(blur.opacity),
                        );
                    }
                    None => out.push_str(&letter),
                }
            }
        }
    }
    out.push_str("</span>");
    out
}

// Up to three decimals, trailing zeros dropped.
fn css_number(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
