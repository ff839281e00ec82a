//! The distortion engine.
//!
//! [`Simulator`] owns the token registry, the timer queue and one controller
//! per rule. It consumes the three inputs of the outside world (text, rule
//! flags and a reset trigger) and is driven by a clock: the caller passes
//! the current time to [`Simulator::advance_to`] once per display frame.
//!
//! # Examples
//!
//! ```
//! use dyslexia_sim::{EngineConfig, Rule, Simulator};
//! use std::time::Duration;
//!
//! let mut sim = Simulator::new(EngineConfig::default())?.with_seed(7);
//! sim.set_text("La lettura è difficile");
//! sim.set_rule(Rule::WordSwap, true);
//! sim.advance_to(Duration::from_secs(10));
//!
//! sim.set_rule(Rule::WordSwap, false);
//! assert_eq!(sim.registry().displayed_document(), "La lettura è difficile");
//! # Ok::<(), dyslexia_sim::Error>(())
//! ```

use crate::config::EngineConfig;
use crate::dictionary::SubstitutionDictionary;
use crate::effects::{
    BlurPulse, EffectContext, EffectController, LetterSwap, Rule, Rules, WordSwap,
};
use crate::error::Result;
use crate::event::{LogLevel, emit_event, emit_log};
use crate::render::{RenderUnit, render_units};
use crate::schedule::{Scheduler, TimerId, TimerQueue, TimerTask};
use crate::text::{CellMeasurer, Segmenter, TextMeasurer, TokenRegistry};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Single-document distortion engine.
pub struct Simulator {
    config: EngineConfig,
    dictionary: SubstitutionDictionary,
    measurer: Box<dyn TextMeasurer>,
    rng: Box<dyn RngCore>,
    timers: TimerQueue,
    registry: TokenRegistry,
    flags: Rules,
    letter_swap: LetterSwap,
    blur_pulse: BlurPulse,
    word_swap: WordSwap,
    input: String,
    settle: Option<TimerId>,
}

impl Simulator {
    /// Create an engine with the built-in dictionary, a terminal-cell
    /// measurer and an entropy-seeded RNG. No rules are enabled.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            letter_swap: LetterSwap::new(config.letter_swap.clone()),
            blur_pulse: BlurPulse::new(config.blur_pulse.clone()),
            word_swap: WordSwap::new(config.word_swap.clone()),
            config,
            dictionary: SubstitutionDictionary::builtin(),
            measurer: Box::new(CellMeasurer::default()),
            rng: Box::new(ChaCha8Rng::from_entropy()),
            timers: TimerQueue::new(),
            registry: TokenRegistry::new(),
            flags: Rules::empty(),
            input: String::new(),
            settle: None,
        })
    }

    /// Builder-style dictionary setter. Re-segments the current input.
    #[must_use]
    pub fn with_dictionary(mut self, dictionary: SubstitutionDictionary) -> Self {
        self.dictionary = dictionary;
        self.resegment();
        self
    }

    /// Builder-style measurer setter. Re-segments the current input.
    #[must_use]
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self.resegment();
        self
    }

    /// Builder-style deterministic RNG.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(Box::new(ChaCha8Rng::seed_from_u64(seed)))
    }

    /// Builder-style RNG setter.
    #[must_use]
    pub fn with_rng(mut self, rng: Box<dyn RngCore>) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn dictionary(&self) -> &SubstitutionDictionary {
        &self.dictionary
    }

    #[must_use]
    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Rules the user has switched on.
    #[must_use]
    pub fn rules(&self) -> Rules {
        self.flags
    }

    /// Whether `rule` has a running schedule.
    #[must_use]
    pub fn is_rule_active(&self, rule: Rule) -> bool {
        self.controller(rule).is_active()
    }

    /// Whether a reset is waiting for its settle delay.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// Handles owned by `rule`'s controller.
    #[must_use]
    pub fn outstanding(&self, rule: Rule) -> usize {
        self.controller(rule).outstanding()
    }

    /// Timers waiting in the queue.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// When the next timer fires, if any.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Renderable units for the current displays.
    #[must_use]
    pub fn render_units(&self) -> Vec<RenderUnit<'_>> {
        render_units(&self.registry)
    }

    /// Replace the input text.
    ///
    /// Running rules are stopped, the text is re-segmented and every flagged
    /// rule is started again at once. Empty or whitespace-only text clears
    /// the output and schedules nothing.
    pub fn set_text(&mut self, text: &str) {
        self.stop_all();
        self.cancel_settle();
        text.clone_into(&mut self.input);
        self.resegment();
        emit_event(
            "engine.input",
            &format!("tokens={} bytes={}", self.registry.len(), text.len()),
        );
        self.start_flagged();
    }

    /// Switch a rule on or off.
    pub fn set_rule(&mut self, rule: Rule, enabled: bool) {
        self.flags.set(rule.flag(), enabled);
        if !enabled {
            self.with_controller(rule, |controller, cx| controller.disable(cx));
        } else if self.settle.is_none() && self.has_words() {
            self.with_controller(rule, |controller, cx| controller.enable(cx));
        }
    }

    /// Replace every flag at once.
    pub fn set_rules(&mut self, rules: Rules) {
        for rule in Rule::ALL {
            self.set_rule(rule, rules.has(rule));
        }
    }

    /// Stop everything, re-segment the input and restart the flagged rules
    /// after the settle delay.
    pub fn reset(&mut self) {
        emit_log(LogLevel::Info, "engine: reset");
        self.stop_all();
        self.cancel_settle();
        self.registry.restore_all();
        self.resegment();
        if self.has_words() {
            self.settle = Some(self.timers.schedule(self.config.reset_settle, TimerTask::Settle));
        }
    }

    /// Advance the clock to `now`, firing due timers in order and then
    /// stepping animations once.
    pub fn advance_to(&mut self, now: Duration) {
        if now < self.timers.now() {
            emit_log(
                LogLevel::Debug,
                &format!("engine: clock went backwards to {}ms", now.as_millis()),
            );
            return;
        }
        while let Some((id, task)) = self.timers.pop_due(now) {
            match task.rule() {
                Some(rule) => {
                    self.with_controller(rule, |controller, cx| controller.on_timer(id, task, cx));
                }
                None if self.settle == Some(id) => {
                    self.settle = None;
                    self.start_flagged();
                }
                None => emit_log(
                    LogLevel::Debug,
                    &format!("engine: ignoring stale settle timer #{}", id.raw()),
                ),
            }
        }
        self.timers.advance_to(now);
        for rule in Rule::ALL {
            self.with_controller(rule, |controller, cx| controller.on_frame(cx));
        }
    }

    /// Advance the clock by `delta`.
    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.timers.now() + delta);
    }

    fn has_words(&self) -> bool {
        self.registry.words().next().is_some()
    }

    fn resegment(&mut self) {
        if self.input.trim().is_empty() {
            self.registry.clear();
            return;
        }
        let segmentation = Segmenter::new(&self.dictionary, &self.config.font)
            .segment(&self.input, &mut *self.measurer);
        self.registry.rebuild(segmentation);
    }

    fn stop_all(&mut self) {
        for rule in Rule::ALL {
            self.with_controller(rule, |controller, cx| controller.disable(cx));
        }
    }

    fn start_flagged(&mut self) {
        if !self.has_words() {
            return;
        }
        for rule in self.flags.rules() {
            self.with_controller(rule, |controller, cx| controller.enable(cx));
        }
    }

    fn cancel_settle(&mut self) {
        if let Some(id) = self.settle.take() {
            self.timers.cancel(id);
        }
    }

    fn controller(&self, rule: Rule) -> &dyn EffectController {
        match rule {
            Rule::LetterSwap => &self.letter_swap,
            Rule::BlurPulse => &self.blur_pulse,
            Rule::WordSwap => &self.word_swap,
        }
    }

    fn with_controller<T>(
        &mut self,
        rule: Rule,
        f: impl FnOnce(&mut dyn EffectController, &mut EffectContext<'_>) -> T,
    ) -> T {
        let Self {
            dictionary,
            rng,
            timers,
            registry,
            letter_swap,
            blur_pulse,
            word_swap,
            ..
        } = self;
        let controller: &mut dyn EffectController = match rule {
            Rule::LetterSwap => letter_swap,
            Rule::BlurPulse => blur_pulse,
            Rule::WordSwap => word_swap,
        };
        let mut cx = EffectContext {
            registry,
            scheduler: timers,
            rng: &mut **rng,
            dictionary,
        };
        f(controller, &mut cx)
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("now", &self.timers.now())
            .field("flags", &self.flags)
            .field("tokens", &self.registry.len())
            .field("pending_timers", &self.timers.pending())
            .field("settling", &self.settle.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn sim(text: &str) -> Simulator {
        let mut sim = Simulator::new(EngineConfig::default()).unwrap().with_seed(42);
        sim.set_text(text);
        sim
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.word_swap.probability = 2.0;
        assert!(Simulator::new(config).is_err());
    }

    #[test]
    fn rule_starts_immediately_when_text_present() {
        let mut sim = sim("La lettura è difficile");
        sim.set_rule(Rule::LetterSwap, true);
        assert!(sim.is_rule_active(Rule::LetterSwap));
        assert!(sim.rules().has(Rule::LetterSwap));
        assert!(sim.outstanding(Rule::LetterSwap) >= 1);
    }

    #[test]
    fn empty_input_schedules_nothing() {
        let mut sim = sim("   \n\t ");
        assert!(sim.registry().is_empty());
        sim.set_rules(Rules::all());
        for rule in Rule::ALL {
            assert!(!sim.is_rule_active(rule));
        }
        assert_eq!(sim.pending_timers(), 0);
        sim.reset();
        assert!(!sim.is_settling());
    }

    #[test]
    fn flags_set_before_text_start_on_input() {
        let mut sim = Simulator::new(EngineConfig::default()).unwrap().with_seed(1);
        sim.set_rule(Rule::BlurPulse, true);
        assert!(!sim.is_rule_active(Rule::BlurPulse));
        sim.set_text("difficile");
        assert!(sim.is_rule_active(Rule::BlurPulse));
    }

    #[test]
    fn new_input_replaces_tokens_and_restarts_rules() {
        let mut sim = sim("casa");
        sim.set_rule(Rule::LetterSwap, true);
        let generation = sim.registry().generation();
        sim.set_text("Meglio tardi");
        assert_eq!(sim.registry().generation(), generation + 1);
        assert_eq!(sim.registry().original(0), Some("Meglio"));
        assert!(sim.is_rule_active(Rule::LetterSwap));
    }

    #[test]
    fn reset_waits_for_settle_delay() {
        let mut sim = sim("La lettura è difficile");
        sim.set_rules(Rules::all());
        sim.advance_to(ms(1000));

        sim.reset();
        assert!(sim.is_settling());
        assert!(sim.registry().all_restored());
        for rule in Rule::ALL {
            assert!(!sim.is_rule_active(rule));
        }
        assert_eq!(sim.pending_timers(), 1);

        sim.advance_to(ms(1099));
        assert!(!sim.is_rule_active(Rule::WordSwap));
        sim.advance_to(ms(1100));
        assert!(!sim.is_settling());
        for rule in Rule::ALL {
            assert!(sim.is_rule_active(rule));
        }
    }

    #[test]
    fn rule_disabled_during_settle_stays_off() {
        let mut sim = sim("La lettura è difficile");
        sim.set_rules(Rules::all());
        sim.reset();
        sim.set_rule(Rule::BlurPulse, false);
        sim.set_rule(Rule::WordSwap, true);
        assert!(!sim.is_rule_active(Rule::WordSwap));
        sim.advance_to(ms(100));
        assert!(sim.is_rule_active(Rule::LetterSwap));
        assert!(!sim.is_rule_active(Rule::BlurPulse));
        assert!(sim.is_rule_active(Rule::WordSwap));
    }

    #[test]
    fn disabling_every_rule_leaves_no_timers() {
        let mut sim = sim("La lettura è difficile. Meglio tardi che mai!");
        sim.set_rules(Rules::all());
        sim.advance_to(ms(12_345));
        sim.set_rules(Rules::empty());
        assert_eq!(sim.pending_timers(), 0);
        assert!(sim.registry().all_restored());

        let writes = sim.registry().writes();
        sim.advance_to(ms(60_000));
        assert_eq!(sim.registry().writes(), writes);
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut sim = sim("casa");
        sim.advance_to(ms(500));
        sim.advance_to(ms(100));
        assert_eq!(sim.now(), ms(500));
        sim.advance_by(ms(250));
        assert_eq!(sim.now(), ms(750));
    }
}
