//! ANSI escape sequence generation.

pub mod output;
pub mod sequences;

pub use output::AnsiWriter;
pub use sequences::*;

use crate::color::Rgba;
use crate::error::Error;
use crate::style::TextAttributes;
use std::io::{self, Write};
use std::str::FromStr;

/// Color output mode for ANSI sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// True color (24-bit RGB).
    #[default]
    TrueColor,
    /// 256-color palette.
    Color256,
    /// Attributes only.
    NoColor,
}

impl FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truecolor" | "24bit" => Ok(Self::TrueColor),
            "256" => Ok(Self::Color256),
            "none" | "off" => Ok(Self::NoColor),
            other => Err(Error::InvalidConfig(format!(
                "unknown color mode {other:?} (expected truecolor, 256 or none)"
            ))),
        }
    }
}

/// Which SGR color slot to write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Fg,
    Bg,
}

fn write_color(w: &mut impl Write, color: Rgba, mode: ColorMode, layer: Layer) -> io::Result<()> {
    let base = match layer {
        Layer::Fg => 38,
        Layer::Bg => 48,
    };
    match mode {
        ColorMode::TrueColor => {
            let (r, g, b) = color.to_rgb_u8();
            write!(w, "\x1b[{base};2;{r};{g};{b}m")
        }
        ColorMode::Color256 => write!(w, "\x1b[{base};5;{}m", color.to_256_color()),
        ColorMode::NoColor => Ok(()),
    }
}

/// Write the SGR sequence selecting `color` as foreground.
pub fn write_fg_color_with_mode(w: &mut impl Write, color: Rgba, mode: ColorMode) -> io::Result<()> {
    write_color(w, color, mode, Layer::Fg)
}

/// Write the SGR sequence selecting `color` as background.
pub fn write_bg_color_with_mode(w: &mut impl Write, color: Rgba, mode: ColorMode) -> io::Result<()> {
    write_color(w, color, mode, Layer::Bg)
}

/// Write one SGR sequence with the given parameters. Nothing is written
/// when there are none.
pub fn write_sgr<'a>(w: &mut impl Write, codes: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
    let mut codes = codes.into_iter().peekable();
    if codes.peek().is_none() {
        return Ok(());
    }
    w.write_all(b"\x1b[")?;
    let mut first = true;
    for code in codes {
        if !first {
            w.write_all(b";")?;
        }
        w.write_all(code.as_bytes())?;
        first = false;
    }
    w.write_all(b"m")
}

/// Write the sequence enabling `attrs`.
pub fn write_attributes(w: &mut impl Write, attrs: TextAttributes) -> io::Result<()> {
    write_sgr(w, attrs.sgr_on())
}

/// Write the sequence moving the cursor to 0-based (`row`, `col`).
pub fn write_cursor_position(w: &mut impl Write, row: u32, col: u32) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", row + 1, col + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_color_modes() {
        let red = Rgba::from_rgb_u8(255, 0, 0);
        assert_eq!(
            render(|w| write_fg_color_with_mode(w, red, ColorMode::TrueColor)),
            "\x1b[38;2;255;0;0m"
        );
        assert_eq!(
            render(|w| write_bg_color_with_mode(w, red, ColorMode::Color256)),
            "\x1b[48;5;196m"
        );
        assert_eq!(
            render(|w| write_fg_color_with_mode(w, red, ColorMode::NoColor)),
            ""
        );
    }

    #[test]
    fn test_attributes_and_cursor() {
        assert_eq!(
            render(|w| write_attributes(w, TextAttributes::BOLD | TextAttributes::DIM)),
            "\x1b[1;2m"
        );
        assert_eq!(render(|w| write_attributes(w, TextAttributes::empty())), "");
        assert_eq!(render(|w| write_cursor_position(w, 0, 4)), "\x1b[1;5H");
    }

    #[test]
    fn test_color_mode_from_str() {
        assert_eq!("256".parse::<ColorMode>().unwrap(), ColorMode::Color256);
        assert_eq!("none".parse::<ColorMode>().unwrap(), ColorMode::NoColor);
        assert!("cmyk".parse::<ColorMode>().is_err());
    }
}
