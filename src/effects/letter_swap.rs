//! Rule 1: transient confusion between two similar letters.
//!
//! Each pass picks words containing either letter of the pair and shows
//! them with the two letters exchanged (both cases) until a per-word restore
//! timer fires. Passes recur after a random delay, each one re-checking that
//! the rule is still active before rescheduling.

use super::{EffectContext, EffectController, EffectState, Rule, Schedule, ignore_stale};
use crate::config::LetterSwapConfig;
use crate::event::{LogLevel, emit_event, emit_log};
use crate::schedule::{TimerId, TimerTask};
use rand::Rng;

/// Exchange every occurrence of `a` with `b` and vice versa, in both cases.
///
/// The mapping is applied per character in a single pass, so no letter is
/// ever swapped twice and the function is its own inverse.
///
/// ```
/// use dyslexia_sim::effects::swap_letter_pair;
///
/// assert_eq!(swap_letter_pair("casa", ('a', 'e')), "cese");
/// assert_eq!(swap_letter_pair("cese", ('a', 'e')), "casa");
/// assert_eq!(swap_letter_pair("AEREO", ('a', 'e')), "EARAO");
/// ```
#[must_use]
pub fn swap_letter_pair(text: &str, pair: (char, char)) -> String {
    let (lower_a, lower_b) = (lowercase(pair.0), lowercase(pair.1));
    let (upper_a, upper_b) = (uppercase(pair.0), uppercase(pair.1));
    text.chars()
        .map(|c| {
            if c == lower_a {
                lower_b
            } else if c == lower_b {
                lower_a
            } else if c == upper_a {
                upper_b
            } else if c == upper_b {
                upper_a
            } else {
                c
            }
        })
        .collect()
}

/// Whether `text` contains either letter of the pair in any case.
#[must_use]
pub fn contains_pair_letter(text: &str, pair: (char, char)) -> bool {
    let letters = [
        lowercase(pair.0),
        lowercase(pair.1),
        uppercase(pair.0),
        uppercase(pair.1),
    ];
    text.chars().any(|c| letters.contains(&c))
}

// Single-char case mapping; letters with multi-char mappings keep their form.
fn lowercase(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Controller for the letter-swap rule.
#[derive(Debug)]
pub struct LetterSwap {
    config: LetterSwapConfig,
    state: EffectState,
}

impl LetterSwap {
    #[must_use]
    pub fn new(config: LetterSwapConfig) -> Self {
        Self {
            config,
            state: EffectState::Disabled,
        }
    }

    /// Pending restore timers.
    #[must_use]
    pub fn pending_restores(&self) -> usize {
        match &self.state {
            EffectState::Scheduled(schedule) => schedule.restores.len(),
            EffectState::Disabled => 0,
        }
    }

    /// One distortion pass. Returns the number of words swapped.
    fn apply_pass(&mut self, cx: &mut EffectContext<'_>) -> usize {
        let EffectState::Scheduled(schedule) = &mut self.state else {
            return 0;
        };
        let pair = self.config.pair;
        let selected: Vec<usize> = cx
            .registry
            .words()
            .filter(|(_, token)| contains_pair_letter(token.text(), pair))
            .map(|(index, _)| index)
            .collect::<Vec<_>>()
            .into_iter()
            .filter(|_| cx.rng.gen_bool(self.config.probability))
            .collect();

        for &index in &selected {
            let Some(original) = cx.registry.original(index) else {
                continue;
            };
            let swapped = swap_letter_pair(original, pair);
            cx.registry.set_text(index, swapped);
            let delay = self.config.restore_delay.sample(cx.rng);
            let id = cx.scheduler.schedule(delay, TimerTask::Restore {
                rule: Rule::LetterSwap,
                token: index,
            });
            schedule.restores.insert(id, index);
            emit_event(
                "letter_swap.apply",
                &format!("token={index} restore_ms={}", delay.as_millis()),
            );
        }
        selected.len()
    }

    fn schedule_next_cycle(&mut self, cx: &mut EffectContext<'_>) {
        if let EffectState::Scheduled(schedule) = &mut self.state {
            let delay = self.config.cycle_delay.sample(cx.rng);
            schedule.cycle = Some(
                cx.scheduler
                    .schedule(delay, TimerTask::Cycle(Rule::LetterSwap)),
            );
        }
    }
}

impl EffectController for LetterSwap {
    fn rule(&self) -> Rule {
        Rule::LetterSwap
    }

    fn is_active(&self) -> bool {
        self.state.is_active()
    }

    fn enable(&mut self, cx: &mut EffectContext<'_>) {
        if self.is_active() {
            return;
        }
        self.state = EffectState::Scheduled(Schedule::default());
        emit_log(LogLevel::Info, "letter_swap: enabled");
        self.apply_pass(cx);
        self.schedule_next_cycle(cx);
    }

    fn disable(&mut self, cx: &mut EffectContext<'_>) {
        let EffectState::Scheduled(mut schedule) = std::mem::take(&mut self.state) else {
            return;
        };
        schedule.cancel_all(cx.scheduler);
        cx.registry.restore_all();
        emit_log(LogLevel::Info, "letter_swap: disabled");
    }

    fn on_timer(&mut self, id: TimerId, task: TimerTask, cx: &mut EffectContext<'_>) {
        let EffectState::Scheduled(schedule) = &mut self.state else {
            ignore_stale(Rule::LetterSwap, id);
            return;
        };
        match task {
            TimerTask::Cycle(Rule::LetterSwap) if schedule.cycle == Some(id) => {
                schedule.cycle = None;
                self.apply_pass(cx);
                self.schedule_next_cycle(cx);
            }
            TimerTask::Restore { token, .. } if schedule.restores.remove(&id) == Some(token) => {
                cx.registry.restore(token);
                emit_event("letter_swap.restore", &format!("token={token}"));
            }
            _ => ignore_stale(Rule::LetterSwap, id),
        }
    }

    fn outstanding(&self) -> usize {
        self.state.outstanding()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::{Harness, ms};
    use crate::schedule::DelayRange;

    #[test]
    fn swap_is_an_involution() {
        for word in ["casa", "Meglio", "AEREO", "perché", "§a§e", ""] {
            let once = swap_letter_pair(word, ('a', 'e'));
            assert_eq!(swap_letter_pair(&once, ('a', 'e')), word);
        }
    }

    #[test]
    fn swap_preserves_case() {
        assert_eq!(swap_letter_pair("Meglio", ('a', 'e')), "Maglio");
        assert_eq!(swap_letter_pair("Ape", ('a', 'e')), "Epa");
        assert_eq!(swap_letter_pair("bd", ('b', 'd')), "db");
    }

    #[test]
    fn uppercase_word_swaps_each_letter_once() {
        assert_eq!(swap_letter_pair("AEREO", ('a', 'e')), "EARAO");
        assert_eq!(swap_letter_pair("EARAO", ('a', 'e')), "AEREO");
    }

    #[test]
    fn pair_detection() {
        assert!(contains_pair_letter("Elmo", ('a', 'e')));
        assert!(!contains_pair_letter("cuori", ('a', 'e')));
    }

    #[test]
    fn enable_applies_immediately_and_schedules_cycle() {
        let mut config = LetterSwapConfig::default();
        config.probability = 1.0;
        let mut effect = LetterSwap::new(config);
        let mut h = Harness::new("casa cuori Meglio", 1);

        h.with(|cx| effect.enable(cx));
        assert!(effect.is_active());
        assert_eq!(h.registry.displayed_document(), "cese cuori Maglio");
        // one cycle + two restores
        assert_eq!(effect.outstanding(), 3);
        assert_eq!(h.timers.pending(), 3);
    }

    #[test]
    fn restores_after_delay() {
        let mut config = LetterSwapConfig::default();
        config.probability = 1.0;
        config.cycle_delay = DelayRange::from_millis(60_000, 60_001);
        let restore_delay = config.restore_delay;
        let mut effect = LetterSwap::new(config);
        let mut h = Harness::new("casa", 2);

        h.with(|cx| effect.enable(cx));
        assert_eq!(h.registry.displayed_document(), "cese");

        let restore_due = h.timers.next_due().unwrap();
        assert!(restore_delay.contains(restore_due));

        h.advance(&mut effect, restore_due - ms(1));
        assert_eq!(h.registry.displayed_document(), "cese");

        h.advance(&mut effect, restore_due);
        assert_eq!(h.registry.displayed_document(), "casa");
        assert!(h.registry.all_restored());
        assert_eq!(effect.pending_restores(), 0);
        assert!(effect.is_active());
    }

    #[test]
    fn overlapping_passes_restore_to_original() {
        let mut config = LetterSwapConfig::default();
        config.probability = 1.0;
        config.cycle_delay = DelayRange::from_millis(1, 2);
        let mut effect = LetterSwap::new(config);
        let mut h = Harness::new("Meglio", 9);

        h.with(|cx| effect.enable(cx));
        // Several passes land on the same word before any restore fires
        h.advance(&mut effect, ms(20));
        assert_eq!(h.registry.displayed_document(), "Maglio");
        assert!(effect.pending_restores() > 1);

        h.with(|cx| effect.disable(cx));
        assert_eq!(h.registry.displayed_document(), "Meglio");
    }

    #[test]
    fn disable_cancels_everything_and_restores() {
        let mut config = LetterSwapConfig::default();
        config.probability = 1.0;
        let mut effect = LetterSwap::new(config);
        let mut h = Harness::new("casa Meglio", 3);

        h.with(|cx| effect.enable(cx));
        h.with(|cx| effect.disable(cx));
        assert!(!effect.is_active());
        assert_eq!(effect.outstanding(), 0);
        assert_eq!(h.timers.pending(), 0);
        assert!(h.registry.all_restored());

        let writes = h.registry.writes();
        h.advance(&mut effect, ms(60_000));
        assert_eq!(h.registry.writes(), writes);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut effect = LetterSwap::new(LetterSwapConfig::default());
        let mut h = Harness::new("casa", 4);
        let writes = h.registry.writes();
        h.with(|cx| {
            let id = cx
                .scheduler
                .schedule(ms(0), TimerTask::Restore {
                    rule: Rule::LetterSwap,
                    token: 0,
                });
            effect.on_timer(id, TimerTask::Restore {
                rule: Rule::LetterSwap,
                token: 0,
            }, cx);
        });
        assert_eq!(h.registry.writes(), writes);
    }

    #[test]
    fn zero_probability_never_swaps() {
        let mut config = LetterSwapConfig::default();
        config.probability = 0.0;
        let mut effect = LetterSwap::new(config);
        let mut h = Harness::new("casa casa casa", 5);
        h.with(|cx| effect.enable(cx));
        h.advance(&mut effect, ms(20_000));
        assert!(h.registry.all_restored());
        // only the cycle timer is outstanding
        assert_eq!(effect.outstanding(), 1);
    }
}
