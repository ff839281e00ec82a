//! Text measurement capability.
//!
//! Segmentation reserves a fixed width for every word so later swaps never
//! reflow the line. The width comes from a [`TextMeasurer`], opened for the
//! duration of one segmentation pass through a [`MeasureSurface`] guard.

use crate::error::{Error, Result};
use crate::unicode::{WidthMethod, display_width_with_method};

/// Unit a measurer reports widths in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthUnit {
    /// Terminal columns.
    #[default]
    Cells,
    /// Device pixels.
    Pixels,
}

impl WidthUnit {
    /// CSS length suffix for markup output.
    #[must_use]
    pub const fn css_suffix(self) -> &'static str {
        match self {
            Self::Cells => "ch",
            Self::Pixels => "px",
        }
    }
}

/// Font the render surface uses; measurement must match it.
#[derive(Clone, Debug, PartialEq)]
pub struct FontMetrics {
    /// Font size in pixels.
    pub size_px: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// CSS-style family list.
    pub family: String,
    /// Average glyph advance as a fraction of the font size.
    pub advance_ratio: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            size_px: 18.0,
            line_height: 1.8,
            family: "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif".to_string(),
            advance_ratio: 0.6,
        }
    }
}

impl FontMetrics {
    /// Horizontal advance of one terminal column, in pixels.
    #[must_use]
    pub fn column_px(&self) -> f32 {
        self.size_px * self.advance_ratio
    }

    /// Reject sizes that would make every width zero or infinite.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.size_px) || !positive(self.line_height) || !positive(self.advance_ratio)
        {
            return Err(Error::InvalidConfig(format!(
                "font metrics must be positive, got size {} line height {} advance {}",
                self.size_px, self.line_height, self.advance_ratio
            )));
        }
        Ok(())
    }
}

/// Measures rendered text width.
///
/// `attach` and `detach` bracket one measurement pass, so implementations
/// backed by a real surface can create and remove their hidden probe element.
pub trait TextMeasurer {
    /// Unit of the values returned by [`measure`](Self::measure).
    fn unit(&self) -> WidthUnit;

    /// Prepare a hidden measurement surface using `font`.
    fn attach(&mut self, _font: &FontMetrics) {}

    /// Rendered width of `text`.
    fn measure(&mut self, text: &str) -> u32;

    /// Tear the measurement surface down.
    fn detach(&mut self) {}
}

/// Scoped measurement surface.
///
/// Attaches on creation and always detaches on drop, including when a pass
/// unwinds.
pub struct MeasureSurface<'a> {
    measurer: &'a mut dyn TextMeasurer,
}

impl<'a> MeasureSurface<'a> {
    /// Attach `measurer` with `font` for the lifetime of the guard.
    pub fn open(measurer: &'a mut dyn TextMeasurer, font: &FontMetrics) -> Self {
        measurer.attach(font);
        Self { measurer }
    }

    /// Rendered width of `text`.
    pub fn width(&mut self, text: &str) -> u32 {
        self.measurer.measure(text)
    }

    /// Unit of the measured widths.
    #[must_use]
    pub fn unit(&self) -> WidthUnit {
        self.measurer.unit()
    }
}

impl Drop for MeasureSurface<'_> {
    fn drop(&mut self) {
        self.measurer.detach();
    }
}

/// Measures in terminal columns.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellMeasurer {
    method: WidthMethod,
}

impl CellMeasurer {
    /// Measurer using `method` for ambiguous-width characters.
    #[must_use]
    pub const fn new(method: WidthMethod) -> Self {
        Self { method }
    }
}

impl TextMeasurer for CellMeasurer {
    fn unit(&self) -> WidthUnit {
        WidthUnit::Cells
    }

    fn measure(&mut self, text: &str) -> u32 {
        u32::try_from(display_width_with_method(text, self.method)).unwrap_or(u32::MAX)
    }
}

/// Measures in pixels assuming a fixed advance per column.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonospaceMeasurer {
    column_px: f32,
}

impl TextMeasurer for MonospaceMeasurer {
    fn unit(&self) -> WidthUnit {
        WidthUnit::Pixels
    }

    fn attach(&mut self, font: &FontMetrics) {
        self.column_px = font.column_px();
    }

    fn measure(&mut self, text: &str) -> u32 {
        let columns = display_width_with_method(text, WidthMethod::WcWidth) as f32;
        (columns * self.column_px).ceil() as u32
    }

    fn detach(&mut self) {
        self.column_px = 0.0;
    }
}
