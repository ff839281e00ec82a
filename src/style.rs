//! Glyph styling for the terminal surface.
//!
//! - [`TextAttributes`]: SGR attribute bitflags
//! - [`Style`]: colors plus attributes
//! - [`Theme`]: the ink and paper colors a document is drawn with
//!
//! # Examples
//!
//! ```
//! use dyslexia_sim::{Rgba, Style, TextAttributes};
//!
//! let heavy = Style::fg(Rgba::BLACK).with_attributes(TextAttributes::DIM);
//! assert!(heavy.attributes.contains(TextAttributes::DIM));
//! ```

use crate::color::Rgba;
use bitflags::bitflags;

bitflags! {
    /// Text rendering attributes.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        /// Bold/increased intensity.
        const BOLD      = 0x01;
        /// Dim/decreased intensity.
        const DIM       = 0x02;
        const ITALIC    = 0x04;
        const UNDERLINE = 0x08;
    }
}

impl TextAttributes {
    /// SGR parameters that switch these attributes on.
    pub fn sgr_on(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::BOLD, "1"),
            (Self::DIM, "2"),
            (Self::ITALIC, "3"),
            (Self::UNDERLINE, "4"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, code)| code)
    }

    /// SGR parameters that switch these attributes off. Bold and dim share
    /// one reset code.
    pub fn sgr_off(self) -> impl Iterator<Item = &'static str> {
        let intensity = self.intersects(Self::BOLD | Self::DIM);
        [
            (intensity, "22"),
            (self.contains(Self::ITALIC), "23"),
            (self.contains(Self::UNDERLINE), "24"),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .map(|(_, code)| code)
    }
}

/// Colors and attributes of one glyph.
///
/// `None` colors fall back to the surface theme.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attributes: TextAttributes,
}

impl Style {
    /// No colors, no attributes.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        attributes: TextAttributes::empty(),
    };

    /// Only a foreground color.
    #[must_use]
    pub const fn fg(color: Rgba) -> Self {
        Self {
            fg: Some(color),
            bg: None,
            attributes: TextAttributes::empty(),
        }
    }

    #[must_use]
    pub const fn with_bg(self, color: Rgba) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    /// Add `attrs` to the existing attributes.
    #[must_use]
    pub const fn with_attributes(self, attrs: TextAttributes) -> Self {
        Self {
            attributes: self.attributes.union(attrs),
            ..self
        }
    }
}

/// Ink and paper colors of a rendered document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub ink: Rgba,
    pub paper: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            ink: Rgba::from_rgb_u8(0x33, 0x33, 0x33),
            paper: Rgba::from_rgb_u8(0xfa, 0xfa, 0xf7),
        }
    }
}

impl Theme {
    /// Resolve a style against this theme.
    #[must_use]
    pub fn resolve(&self, style: Style) -> (Rgba, Rgba) {
        (style.fg.unwrap_or(self.ink), style.bg.unwrap_or(self.paper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgr_codes() {
        let attrs = TextAttributes::BOLD | TextAttributes::UNDERLINE;
        assert_eq!(attrs.sgr_on().collect::<Vec<_>>(), ["1", "4"]);
        assert_eq!(attrs.sgr_off().collect::<Vec<_>>(), ["22", "24"]);
        assert_eq!(
            (TextAttributes::BOLD | TextAttributes::DIM)
                .sgr_off()
                .collect::<Vec<_>>(),
            ["22"]
        );
    }

    #[test]
    fn test_style_builders() {
        let style = Style::fg(Rgba::BLACK)
            .with_bg(Rgba::WHITE)
            .with_attributes(TextAttributes::DIM);
        assert_eq!(style.fg, Some(Rgba::BLACK));
        assert_eq!(style.bg, Some(Rgba::WHITE));
        assert_eq!(style.attributes, TextAttributes::DIM);
    }

    #[test]
    fn test_theme_resolve() {
        let theme = Theme::default();
        assert_eq!(theme.resolve(Style::NONE), (theme.ink, theme.paper));
        assert_eq!(theme.resolve(Style::fg(Rgba::BLACK)).0, Rgba::BLACK);
    }
}
