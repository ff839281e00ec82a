//! Distortion effects and their controllers.
//!
//! Each rule is driven by one [`EffectController`] that owns its whole
//! lifecycle: enabling starts a schedule, timers and frames mutate token
//! displays, disabling cancels every handle the controller created and
//! restores the originals. Controllers never talk to each other; the only
//! shared state is the [`TokenRegistry`], where the last writer wins.

mod blur_pulse;
mod letter_swap;
mod word_swap;

pub use blur_pulse::{BlurPulse, PulseAnimation, PulseFrame, pulse_glyphs};
pub use letter_swap::{LetterSwap, swap_letter_pair};
pub use word_swap::WordSwap;

use crate::dictionary::SubstitutionDictionary;
use crate::schedule::{Scheduler, TimerId, TimerTask};
use crate::text::TokenRegistry;
use bitflags::bitflags;
use rand::RngCore;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The three distortion rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    /// Rule 1: transient swaps of two similar letters.
    LetterSwap,
    /// Rule 2: pulsing blur on long words.
    BlurPulse,
    /// Rule 3: substitution with similar words.
    WordSwap,
}

impl Rule {
    pub const ALL: [Self; 3] = [Self::LetterSwap, Self::BlurPulse, Self::WordSwap];

    /// Stable lowercase name, used as the event prefix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LetterSwap => "letter_swap",
            Self::BlurPulse => "blur_pulse",
            Self::WordSwap => "word_swap",
        }
    }

    /// Flag bit for this rule.
    #[must_use]
    pub const fn flag(self) -> Rules {
        match self {
            Self::LetterSwap => Rules::LETTER_SWAP,
            Self::BlurPulse => Rules::BLUR_PULSE,
            Self::WordSwap => Rules::WORD_SWAP,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of rules the user has switched on.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Rules: u8 {
        const LETTER_SWAP = 0x01;
        const BLUR_PULSE  = 0x02;
        const WORD_SWAP   = 0x04;
    }
}

impl Rules {
    /// Whether `rule` is in the set.
    #[must_use]
    pub const fn has(self, rule: Rule) -> bool {
        self.contains(rule.flag())
    }

    /// Rules in the set, in rule order.
    pub fn rules(self) -> impl Iterator<Item = Rule> {
        Rule::ALL.into_iter().filter(move |rule| self.has(*rule))
    }
}

/// Everything a controller may touch while handling a callback.
pub struct EffectContext<'a> {
    pub registry: &'a mut TokenRegistry,
    pub scheduler: &'a mut dyn Scheduler,
    pub rng: &'a mut dyn RngCore,
    pub dictionary: &'a SubstitutionDictionary,
}

impl EffectContext<'_> {
    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }
}

/// Lifecycle of one distortion rule.
pub trait EffectController {
    fn rule(&self) -> Rule;

    /// Whether a schedule is running.
    fn is_active(&self) -> bool;

    /// Apply one pass now and start the recurring schedule. No-op if active.
    fn enable(&mut self, cx: &mut EffectContext<'_>);

    /// Cancel every pending handle and restore all tokens. No-op if disabled.
    fn disable(&mut self, cx: &mut EffectContext<'_>);

    /// Handle a fired timer. Timers this controller no longer owns are
    /// ignored.
    fn on_timer(&mut self, id: TimerId, task: TimerTask, cx: &mut EffectContext<'_>);

    /// Advance continuous animations to the current time.
    fn on_frame(&mut self, _cx: &mut EffectContext<'_>) {}

    /// Handles (timers and animations) currently owned.
    fn outstanding(&self) -> usize;
}

/// Timer handles owned by an active timer-driven controller.
#[derive(Debug, Default)]
pub struct Schedule {
    /// Next selection pass.
    pub cycle: Option<TimerId>,
    /// Pending per-token restores.
    pub restores: BTreeMap<TimerId, usize>,
}

impl Schedule {
    /// Cancel every handle with `scheduler`.
    pub fn cancel_all(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(cycle) = self.cycle.take() {
            scheduler.cancel(cycle);
        }
        for id in std::mem::take(&mut self.restores).into_keys() {
            scheduler.cancel(id);
        }
    }

    /// Number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.cycle.is_some()) + self.restores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// State of a timer-driven controller.
#[derive(Debug, Default)]
pub enum EffectState {
    #[default]
    Disabled,
    Scheduled(Schedule),
}

impl EffectState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }

    /// Owned handles, or zero when disabled.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::Scheduled(schedule) => schedule.len(),
        }
    }
}

/// Log that `rule` ignored a timer it no longer owns.
fn ignore_stale(rule: Rule, id: TimerId) {
    crate::event::emit_log(
        crate::event::LogLevel::Debug,
        &format!("{rule}: ignoring stale timer #{}", id.raw()),
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::schedule::TimerQueue;
    use crate::text::{CellMeasurer, FontMetrics, Segmenter};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Registry, timers and RNG wired together for driving one controller.
    pub struct Harness {
        pub registry: TokenRegistry,
        pub timers: TimerQueue,
        pub rng: ChaCha8Rng,
        pub dictionary: SubstitutionDictionary,
    }

    impl Harness {
        pub fn new(text: &str, seed: u64) -> Self {
            let dictionary = SubstitutionDictionary::builtin();
            let font = FontMetrics::default();
            let mut registry = TokenRegistry::new();
            registry.rebuild(
                Segmenter::new(&dictionary, &font).segment(text, &mut CellMeasurer::default()),
            );
            Self {
                registry,
                timers: TimerQueue::new(),
                rng: ChaCha8Rng::seed_from_u64(seed),
                dictionary,
            }
        }

        pub fn with<T>(&mut self, f: impl FnOnce(&mut EffectContext<'_>) -> T) -> T {
            let mut cx = EffectContext {
                registry: &mut self.registry,
                scheduler: &mut self.timers,
                rng: &mut self.rng,
                dictionary: &self.dictionary,
            };
            f(&mut cx)
        }

        /// Fire due timers into `controller`, then run one frame at `until`.
        pub fn advance(&mut self, controller: &mut dyn EffectController, until: Duration) {
            while let Some((id, task)) = self.timers.pop_due(until) {
                self.with(|cx| controller.on_timer(id, task, cx));
            }
            self.timers.advance_to(until);
            self.with(|cx| controller.on_frame(cx));
        }
    }

    pub fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }
}
