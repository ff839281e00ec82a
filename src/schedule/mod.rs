//! Virtual-time timer scheduling.
//!
//! The engine never sleeps. Effects ask a [`Scheduler`] to run a
//! [`TimerTask`] after a delay; the driver advances a [`TimerQueue`] to the
//! current time and dispatches whatever became due, in due-time order.
//!
//! # Examples
//!
//! ```
//! use dyslexia_sim::schedule::{Scheduler, TimerQueue, TimerTask};
//! use dyslexia_sim::Rule;
//! use std::time::Duration;
//!
//! let mut timers = TimerQueue::new();
//! let id = timers.schedule(Duration::from_millis(800), TimerTask::Cycle(Rule::LetterSwap));
//! assert!(timers.pop_due(Duration::from_millis(799)).is_none());
//! let (fired, task) = timers.pop_due(Duration::from_millis(800)).unwrap();
//! assert_eq!(fired, id);
//! assert_eq!(task, TimerTask::Cycle(Rule::LetterSwap));
//! ```

mod delay;

pub use delay::DelayRange;

use crate::effects::Rule;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Opaque handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number (monotonic per queue).
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Work a timer performs when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// Next selection pass of a rule.
    Cycle(Rule),
    /// Put one token back to its original text.
    Restore { rule: Rule, token: usize },
    /// End of the post-reset settle delay.
    Settle,
}

impl TimerTask {
    /// Rule owning this task, if any.
    #[must_use]
    pub const fn rule(self) -> Option<Rule> {
        match self {
            Self::Cycle(rule) | Self::Restore { rule, .. } => Some(rule),
            Self::Settle => None,
        }
    }
}

/// Capability effects use to defer work.
pub trait Scheduler {
    /// Current virtual time.
    fn now(&self) -> Duration;

    /// Run `task` once `delay` has elapsed from [`now`](Self::now).
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancel a pending task. Returns `false` if it already fired or was
    /// cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Min-heap timer queue driven by an external clock.
///
/// Cancellation removes the task immediately; its heap slot is skipped
/// lazily when it reaches the top.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    heap: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: HashMap<u64, TimerTask>,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending (not cancelled, not fired) tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Number of pending tasks owned by `rule`.
    #[must_use]
    pub fn pending_for(&self, rule: Rule) -> usize {
        self.tasks
            .values()
            .filter(|task| task.rule() == Some(rule))
            .count()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.heap.peek().map(|Reverse((due, _))| *due)
    }

    /// Pop the earliest task due at or before `until`.
    ///
    /// The queue clock moves forward to the task's due time, so tasks
    /// scheduled from inside the dispatch are relative to when their parent
    /// fired rather than to `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, TimerTask)> {
        self.discard_cancelled();
        let Reverse((due, seq)) = *self.heap.peek()?;
        if due > until {
            return None;
        }
        self.heap.pop();
        let task = self.tasks.remove(&seq)?;
        self.now = self.now.max(due);
        Some((TimerId(seq), task))
    }

    /// Move the clock to `until` (never backwards).
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, seq))) = self.heap.peek() {
            if self.tasks.contains_key(seq) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let seq = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        self.heap.push(Reverse((due, seq)));
        self.tasks.insert(seq, task);
        TimerId(seq)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.tasks.remove(&id.0).is_some()
    }
}
