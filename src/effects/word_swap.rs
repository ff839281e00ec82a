//! Rule 3: substitution with similar words.
//!
//! On a fixed interval, words with dictionary candidates may be replaced by
//! one of them, left-aligned and clipped inside the width reserved at
//! segmentation so nothing around them moves. Each replacement carries its
//! own restore timer.

use super::{EffectContext, EffectController, EffectState, Rule, Schedule, ignore_stale};
use crate::config::WordSwapConfig;
use crate::event::{LogLevel, emit_event, emit_log};
use crate::schedule::{TimerId, TimerTask};
use crate::text::{Align, Layout, Overflow, match_capitalization};
use rand::Rng;

/// Layout of a substituted word.
const SWAPPED_LAYOUT: Layout = Layout {
    align: Align::Left,
    overflow: Overflow::Clip,
};

/// Controller for the word-swap rule.
#[derive(Debug)]
pub struct WordSwap {
    config: WordSwapConfig,
    state: EffectState,
}

impl WordSwap {
    #[must_use]
    pub fn new(config: WordSwapConfig) -> Self {
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

    /// Selection pass. Returns the number of words replaced.
    fn apply_pass(&mut self, cx: &mut EffectContext<'_>) -> usize {
        let EffectState::Scheduled(schedule) = &mut self.state else {
            return 0;
        };
        let dictionary = cx.dictionary;
        let candidates: Vec<(usize, &[String])> = cx
            .registry
            .words()
            .filter_map(|(index, token)| dictionary.get(token.key()).map(|c| (index, c)))
            .collect();

        let mut replaced = 0;
        for (index, options) in candidates {
            if !cx.rng.gen_bool(self.config.probability) {
                continue;
            }
            let pick = &options[cx.rng.gen_range(0..options.len())];
            let Some(original) = cx.registry.original(index) else {
                continue;
            };
            let shown = match_capitalization(original, pick);
            emit_event(
                "word_swap.apply",
                &format!("token={index} original={original} shown={shown}"),
            );
            cx.registry.set_text(index, shown);
            cx.registry.set_layout(index, SWAPPED_LAYOUT);

            let delay = self.config.restore_delay.sample(cx.rng);
            let id = cx.scheduler.schedule(delay, TimerTask::Restore {
                rule: Rule::WordSwap,
                token: index,
            });
            schedule.restores.insert(id, index);
            replaced += 1;
        }
        replaced
    }

    fn schedule_next_selection(&mut self, cx: &mut EffectContext<'_>) {
        if let EffectState::Scheduled(schedule) = &mut self.state {
            schedule.cycle = Some(cx.scheduler.schedule(
                self.config.selection_interval,
                TimerTask::Cycle(Rule::WordSwap),
            ));
        }
    }
}

impl EffectController for WordSwap {
    fn rule(&self) -> Rule {
        Rule::WordSwap
    }

    fn is_active(&self) -> bool {
        self.state.is_active()
    }

    fn enable(&mut self, cx: &mut EffectContext<'_>) {
        if self.is_active() {
            return;
        }
        self.state = EffectState::Scheduled(Schedule::default());
        emit_log(LogLevel::Info, "word_swap: enabled");
        if cx.dictionary.is_empty() {
            emit_log(LogLevel::Debug, "word_swap: dictionary is empty");
        }
        self.apply_pass(cx);
        self.schedule_next_selection(cx);
    }

    fn disable(&mut self, cx: &mut EffectContext<'_>) {
        let EffectState::Scheduled(mut schedule) = std::mem::take(&mut self.state) else {
            return;
        };
        schedule.cancel_all(cx.scheduler);
        cx.registry.restore_all();
        emit_log(LogLevel::Info, "word_swap: disabled");
    }

    fn on_timer(&mut self, id: TimerId, task: TimerTask, cx: &mut EffectContext<'_>) {
        let EffectState::Scheduled(schedule) = &mut self.state else {
            ignore_stale(Rule::WordSwap, id);
            return;
        };
        match task {
            TimerTask::Cycle(Rule::WordSwap) if schedule.cycle == Some(id) => {
                schedule.cycle = None;
                self.apply_pass(cx);
                self.schedule_next_selection(cx);
            }
            TimerTask::Restore { token, .. } if schedule.restores.remove(&id) == Some(token) => {
                cx.registry.restore(token);
                emit_event("word_swap.restore", &format!("token={token}"));
            }
            _ => ignore_stale(Rule::WordSwap, id),
        }
    }

    fn outstanding(&self) -> usize {
        self.state.outstanding()
    }
}
