//! Engine configuration.
//!
//! Every timing constant and probability the effects use lives here, with
//! defaults matching the reference behaviour. Configs are plain data; call
//! [`EngineConfig::validate`] (done by the engine builder) before use.

use crate::error::{Error, Result};
use crate::schedule::DelayRange;
use crate::text::FontMetrics;
use std::time::Duration;

/// Letter-swap (rule 1) settings.
#[derive(Clone, Debug, PartialEq)]
pub struct LetterSwapConfig {
    /// Letters exchanged in both cases.
    pub pair: (char, char),
    /// Chance that an eligible word is swapped in one pass.
    pub probability: f64,
    /// Wait between passes.
    pub cycle_delay: DelayRange,
    /// How long a swapped word stays swapped.
    pub restore_delay: DelayRange,
}

impl Default for LetterSwapConfig {
    fn default() -> Self {
        Self {
            pair: ('a', 'e'),
            probability: 0.25,
            cycle_delay: DelayRange::from_millis(800, 3500),
            restore_delay: DelayRange::from_millis(500, 3000),
        }
    }
}

/// Blur-pulse (rule 2) settings.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurPulseConfig {
    /// Words must have strictly more letters than this.
    pub min_letters_exclusive: usize,
    /// Chance that an eligible word starts pulsing in one pass.
    pub probability: f64,
    /// Fixed period between selection passes.
    pub selection_interval: Duration,
    /// Length of one blur cycle (sharp, peak, sharp).
    pub period: Duration,
    /// Cycles an animation runs before its word is restored.
    ///
    /// `None` loops the pulse for as long as the rule stays enabled. The
    /// default `Some(1)` restores the word after a single period.
    pub max_cycles: Option<u32>,
    /// Blur radius at full intensity.
    pub peak_radius: f64,
    /// Opacity lost at the peak of the cycle.
    pub opacity_drop: f64,
    /// Letters at or below this radius render sharp.
    pub threshold: f64,
}

impl Default for BlurPulseConfig {
    fn default() -> Self {
        Self {
            min_letters_exclusive: 4,
            probability: 0.30,
            selection_interval: Duration::from_millis(3000),
            period: Duration::from_millis(4000),
            max_cycles: Some(1),
            peak_radius: 3.0,
            opacity_drop: 0.4,
            threshold: 0.1,
        }
    }
}

/// Word-swap (rule 3) settings.
#[derive(Clone, Debug, PartialEq)]
pub struct WordSwapConfig {
    /// Chance that a word with dictionary candidates is replaced in one pass.
    pub probability: f64,
    /// Fixed period between selection passes.
    pub selection_interval: Duration,
    /// How long a replacement stays visible.
    pub restore_delay: DelayRange,
}

impl Default for WordSwapConfig {
    fn default() -> Self {
        Self {
            probability: 0.15,
            selection_interval: Duration::from_millis(4000),
            restore_delay: DelayRange::from_millis(4000, 8000),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub letter_swap: LetterSwapConfig,
    pub blur_pulse: BlurPulseConfig,
    pub word_swap: WordSwapConfig,
    /// Delay between a reset and re-enabling the flagged rules.
    pub reset_settle: Duration,
    /// Font used for width measurement.
    pub font: FontMetrics,
}

impl EngineConfig {
    /// Default settle delay after a reset.
    pub const DEFAULT_RESET_SETTLE: Duration = Duration::from_millis(100);

    /// Configuration with reference defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<()> {
        check_probability("letter_swap.probability", self.letter_swap.probability)?;
        check_probability("blur_pulse.probability", self.blur_pulse.probability)?;
        check_probability("word_swap.probability", self.word_swap.probability)?;

        check_range("letter_swap.cycle_delay", self.letter_swap.cycle_delay)?;
        check_range("letter_swap.restore_delay", self.letter_swap.restore_delay)?;
        check_range("word_swap.restore_delay", self.word_swap.restore_delay)?;

        let (a, b) = self.letter_swap.pair;
        if a.to_lowercase().eq(b.to_lowercase()) {
            return Err(Error::InvalidConfig(format!(
                "letter_swap.pair must name two different letters, got {a:?} and {b:?}"
            )));
        }

        if self.blur_pulse.selection_interval.is_zero() {
            return Err(invalid("blur_pulse.selection_interval must be non-zero"));
        }
        if self.blur_pulse.period.is_zero() {
            return Err(invalid("blur_pulse.period must be non-zero"));
        }
        if self.blur_pulse.max_cycles == Some(0) {
            return Err(invalid("blur_pulse.max_cycles must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.blur_pulse.opacity_drop) {
            return Err(invalid("blur_pulse.opacity_drop must be within [0, 1]"));
        }
        if !self.blur_pulse.peak_radius.is_finite() || self.blur_pulse.peak_radius < 0.0 {
            return Err(invalid("blur_pulse.peak_radius must be a finite non-negative number"));
        }
        if self.word_swap.selection_interval.is_zero() {
            return Err(invalid("word_swap.selection_interval must be non-zero"));
        }

        self.font.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            letter_swap: LetterSwapConfig::default(),
            blur_pulse: BlurPulseConfig::default(),
            word_swap: WordSwapConfig::default(),
            reset_settle: Self::DEFAULT_RESET_SETTLE,
            font: FontMetrics::default(),
        }
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidConfig(reason.to_string())
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be within [0, 1], got {p}"
        )))
    }
}

fn check_range(name: &str, range: DelayRange) -> Result<()> {
    if range.is_valid() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must satisfy min < max, got {:?}..{:?}",
            range.min, range.max
        )))
    }
}
