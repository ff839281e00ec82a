//! RGBA colors for the terminal surface.
//!
//! Colors are stored as `f32` components in `[0, 1]` so faded glyphs can be
//! composited over the paper color before being quantized for output.
//!
//! # Examples
//!
//! ```
//! use dyslexia_sim::Rgba;
//!
//! let ink = Rgba::from_hex("#1a1a2e").unwrap();
//! // A letter at 60% opacity over white paper
//! let faded = ink.multiply_alpha(0.6).blend_over(Rgba::WHITE);
//! assert!(faded.r > ink.r);
//! ```

use std::fmt;

/// RGBA color with f32 components in range [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from f32 components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from u8 components.
    #[must_use]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Parse `#rrggbb` or `#rgb` (the `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgb_u8(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            3 => {
                let short = |s: &str| channel(s).map(|v| v * 17);
                Some(Self::from_rgb_u8(
                    short(hex.get(0..1)?)?,
                    short(hex.get(1..2)?)?,
                    short(hex.get(2..3)?)?,
                ))
            }
            _ => None,
        }
    }

    /// Porter-Duff "over": `self` on top of `other`.
    #[must_use]
    pub fn blend_over(self, other: Self) -> Self {
        if self.a >= 1.0 {
            return self;
        }
        if self.a <= 0.0 {
            return other;
        }
        let inv_alpha = 1.0 - self.a;
        let out_a = other.a.mul_add(inv_alpha, self.a);
        if out_a <= 1e-6 {
            return Self::TRANSPARENT;
        }
        let mix = |fg: f32, bg: f32| (bg * other.a).mul_add(inv_alpha, fg * self.a) / out_a;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: out_a,
        }
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.r, self.g, self.b, alpha)
    }

    /// Scale alpha by `factor`.
    #[must_use]
    pub fn multiply_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor.clamp(0.0, 1.0))
    }

    /// Quantize to u8 RGB, clamping.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        let to_u8 = |value: f32| (value * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Nearest xterm 256-color index: the grayscale ramp for near-grays,
    /// otherwise the 6x6x6 cube.
    #[must_use]
    pub fn to_256_color(self) -> u8 {
        let (r, g, b) = self.to_rgb_u8();
        let gray = ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8;
        let near = |c: u8| (i16::from(c) - i16::from(gray)).abs() < 10;
        if near(r) && near(g) && near(b) {
            let step = (u16::from(gray) * 24 / 256) as u8;
            return 232 + step.min(23);
        }
        16 + 36 * cube_index(r) + 6 * cube_index(g) + cube_index(b)
    }
}

// Cube levels are 0, 95, 135, 175, 215, 255; boundaries sit at the midpoints.
fn cube_index(value: u8) -> u8 {
    match value {
        0..=47 => 0,
        48..=114 => 1,
        115..=154 => 2,
        155..=194 => 3,
        195..=234 => 4,
        _ => 5,
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb_u8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#ffffff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::from_hex("000"), Some(Rgba::BLACK));
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#gg0000"), None);
        assert_eq!(Rgba::from_hex("#1a1a2e").unwrap().to_string(), "#1a1a2e");
    }

    #[test]
    fn test_blend_over_extremes() {
        assert_eq!(Rgba::BLACK.blend_over(Rgba::WHITE), Rgba::BLACK);
        assert_eq!(Rgba::TRANSPARENT.blend_over(Rgba::WHITE), Rgba::WHITE);
    }

    #[test]
    fn test_faded_ink_is_lighter() {
        let faded = Rgba::BLACK.multiply_alpha(0.6).blend_over(Rgba::WHITE);
        assert!((faded.r - 0.4).abs() < 1e-5);
        assert!((faded.a - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_to_256_color() {
        assert_eq!(Rgba::from_rgb_u8(255, 0, 0).to_256_color(), 196);
        assert_eq!(Rgba::BLACK.to_256_color(), 232);
        assert_eq!(Rgba::WHITE.to_256_color(), 255);
    }
}
