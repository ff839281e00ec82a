//! Rule 2: pulsing blur on long words.
//!
//! A selection pass runs on a fixed interval and starts an animation on some
//! of the long words. Each animation is a pure function of elapsed time: the
//! blur rises and falls along a half sine over one period, strongest at the
//! word's center letter, with the first and last letters always sharp.

use super::{EffectContext, EffectController, Rule, ignore_stale};
use crate::config::BlurPulseConfig;
use crate::event::{LogLevel, emit_event, emit_log};
use crate::schedule::{TimerId, TimerTask};
use crate::text::{Blur, Glyph};
use crate::unicode::letters;
use rand::Rng;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::time::Duration;

/// Result of stepping one animation.
#[derive(Clone, Debug, PartialEq)]
pub enum PulseFrame {
    /// Show these glyphs and keep animating.
    Continue(Vec<Glyph>),
    /// The animation is over; show the original again.
    StopAndRestore,
}

/// Per-letter glyphs of a word `elapsed` into its pulse.
///
/// ```
/// use dyslexia_sim::config::BlurPulseConfig;
/// use dyslexia_sim::effects::pulse_glyphs;
/// use std::time::Duration;
///
/// let config = BlurPulseConfig::default();
/// let letters = ["d", "i", "f", "f", "i", "c", "i", "l", "e"];
///
/// // Sharp at the start of the cycle
/// let start = pulse_glyphs(&letters, Duration::ZERO, &config);
/// assert!(start.iter().all(|g| g.blur.is_none()));
///
/// // Center letter at full strength half-way through
/// let peak = pulse_glyphs(&letters, Duration::from_millis(2000), &config);
/// let blur = peak[4].blur.unwrap();
/// assert!((blur.radius - 3.0).abs() < 1e-9);
/// assert!((blur.opacity - 0.6).abs() < 1e-9);
/// assert!(peak[0].blur.is_none() && peak[8].blur.is_none());
/// ```
#[must_use]
pub fn pulse_glyphs<S: AsRef<str>>(
    letters: &[S],
    elapsed: Duration,
    config: &BlurPulseConfig,
) -> Vec<Glyph> {
    let period = config.period.as_secs_f64();
    let progress = if period > 0.0 {
        (elapsed.as_secs_f64() % period) / period
    } else {
        0.0
    };
    let blur_progress = (progress * PI).sin();
    let opacity = 1.0 - blur_progress * config.opacity_drop;

    let len = letters.len() as f64;
    let center = (len / 2.0).floor();
    let max_distance = (center - 1.0).max(len - center - 2.0);
    let last = letters.len().saturating_sub(1);

    letters
        .iter()
        .enumerate()
        .map(|(i, letter)| {
            let letter = letter.as_ref();
            if i == 0 || i == last || max_distance <= 0.0 {
                return Glyph::sharp(letter);
            }
            let distance = (i as f64 - center).abs();
            let base = (1.0 - distance / max_distance).max(0.0);
            let radius = base * blur_progress * config.peak_radius;
            if radius > config.threshold {
                Glyph {
                    text: letter.to_string(),
                    blur: Some(Blur { radius, opacity }),
                }
            } else {
                Glyph::sharp(letter)
            }
        })
        .collect()
}

/// One running pulse on one token.
#[derive(Clone, Debug)]
pub struct PulseAnimation {
    token: usize,
    started: Duration,
    letters: Vec<String>,
}

impl PulseAnimation {
    #[must_use]
    pub fn new(token: usize, original: &str, started: Duration) -> Self {
        Self {
            token,
            started,
            letters: letters(original).into_iter().map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn token(&self) -> usize {
        self.token
    }

    #[must_use]
    pub fn started(&self) -> Duration {
        self.started
    }

    /// Compute the frame for `now`. Once the rule is off or the configured
    /// number of cycles has elapsed, the animation asks to be restored.
    #[must_use]
    pub fn step(&self, now: Duration, enabled: bool, config: &BlurPulseConfig) -> PulseFrame {
        let elapsed = now.saturating_sub(self.started);
        let finished = config
            .max_cycles
            .is_some_and(|cycles| elapsed >= config.period.saturating_mul(cycles));
        if !enabled || finished {
            PulseFrame::StopAndRestore
        } else {
            PulseFrame::Continue(pulse_glyphs(&self.letters, elapsed, config))
        }
    }
}

#[derive(Debug, Default)]
enum PulseState {
    #[default]
    Disabled,
    Animating {
        cycle: Option<TimerId>,
        animations: BTreeMap<usize, PulseAnimation>,
    },
}

/// Controller for the blur-pulse rule.
#[derive(Debug)]
pub struct BlurPulse {
    config: BlurPulseConfig,
    state: PulseState,
}

impl BlurPulse {
    #[must_use]
    pub fn new(config: BlurPulseConfig) -> Self {
        Self {
            config,
            state: PulseState::Disabled,
        }
    }

    /// Number of running animations.
    #[must_use]
    pub fn animating(&self) -> usize {
        match &self.state {
            PulseState::Animating { animations, .. } => animations.len(),
            PulseState::Disabled => 0,
        }
    }

    /// Whether token `index` is pulsing.
    #[must_use]
    pub fn is_animating(&self, index: usize) -> bool {
        match &self.state {
            PulseState::Animating { animations, .. } => animations.contains_key(&index),
            PulseState::Disabled => false,
        }
    }

    /// Selection pass. Returns the number of animations started.
    fn select(&mut self, cx: &mut EffectContext<'_>) -> usize {
        let PulseState::Animating { animations, .. } = &mut self.state else {
            return 0;
        };
        let min_letters = self.config.min_letters_exclusive;
        let probability = self.config.probability;
        let eligible: Vec<usize> = cx
            .registry
            .words()
            .filter(|(_, token)| crate::unicode::letter_count(token.text()) > min_letters)
            .map(|(index, _)| index)
            .collect();

        let now = cx.now();
        let mut started = 0;
        for index in eligible {
            // Draw for every eligible word so running animations don't shift
            // the odds of the others.
            if !cx.rng.gen_bool(probability) || animations.contains_key(&index) {
                continue;
            }
            let Some(original) = cx.registry.original(index) else {
                continue;
            };
            let animation = PulseAnimation::new(index, original, now);
            if let PulseFrame::Continue(glyphs) = animation.step(now, true, &self.config) {
                cx.registry.set_glyphs(index, glyphs);
            }
            animations.insert(index, animation);
            emit_event("blur_pulse.start", &format!("token={index}"));
            started += 1;
        }
        started
    }

    fn schedule_next_selection(&mut self, cx: &mut EffectContext<'_>) {
        if let PulseState::Animating { cycle, .. } = &mut self.state {
            *cycle = Some(cx.scheduler.schedule(
                self.config.selection_interval,
                TimerTask::Cycle(Rule::BlurPulse),
            ));
        }
    }
}

impl EffectController for BlurPulse {
    fn rule(&self) -> Rule {
        Rule::BlurPulse
    }

    fn is_active(&self) -> bool {
        matches!(self.state, PulseState::Animating { .. })
    }

    fn enable(&mut self, cx: &mut EffectContext<'_>) {
        if self.is_active() {
            return;
        }
        self.state = PulseState::Animating {
            cycle: None,
            animations: BTreeMap::new(),
        };
        emit_log(LogLevel::Info, "blur_pulse: enabled");
        self.select(cx);
        self.schedule_next_selection(cx);
    }

    fn disable(&mut self, cx: &mut EffectContext<'_>) {
        let PulseState::Animating { cycle, animations } = std::mem::take(&mut self.state) else {
            return;
        };
        if let Some(id) = cycle {
            cx.scheduler.cancel(id);
        }
        for animation in animations.values() {
            emit_event("blur_pulse.stop", &format!("token={}", animation.token()));
        }
        cx.registry.restore_all();
        emit_log(LogLevel::Info, "blur_pulse: disabled");
    }

    fn on_timer(&mut self, id: TimerId, task: TimerTask, cx: &mut EffectContext<'_>) {
        let PulseState::Animating { cycle, .. } = &mut self.state else {
            ignore_stale(Rule::BlurPulse, id);
            return;
        };
        if task != TimerTask::Cycle(Rule::BlurPulse) || *cycle != Some(id) {
            ignore_stale(Rule::BlurPulse, id);
            return;
        }
        *cycle = None;
        self.select(cx);
        self.schedule_next_selection(cx);
    }

    fn on_frame(&mut self, cx: &mut EffectContext<'_>) {
        let PulseState::Animating { animations, .. } = &mut self.state else {
            return;
        };
        let now = cx.now();
        let config = &self.config;
        animations.retain(|&index, animation| match animation.step(now, true, config) {
            PulseFrame::Continue(glyphs) => {
                cx.registry.set_glyphs(index, glyphs);
                true
            }
            PulseFrame::StopAndRestore => {
                cx.registry.restore(index);
                emit_event("blur_pulse.stop", &format!("token={index}"));
                false
            }
        });
    }

    fn outstanding(&self) -> usize {
        match &self.state {
            PulseState::Disabled => 0,
            PulseState::Animating { cycle, animations } => {
                usize::from(cycle.is_some()) + animations.len()
            }
        }
    }
}
