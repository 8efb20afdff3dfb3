//! Cancellable scheduled callbacks over a virtual clock.
//!
//! Nothing here runs on its own: the owner advances the clock with
//! [`Scheduler::advance`] and dispatches the returned timer ids. Cancelled
//! timers never appear in a later `advance`.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Handle returned when a timer is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: TimerId,
    due: Duration,
    repeat: Repeat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_once(&mut self, delay: Duration) -> TimerId {
        self.insert(delay, Repeat::Once)
    }

    /// Schedule a repeating timer. A zero period is bumped to one millisecond
    /// so `advance` always terminates.
    pub fn schedule_every(&mut self, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(period, Repeat::Every(period))
    }

    fn insert(&mut self, delay: Duration, repeat: Repeat) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            repeat,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Move the clock forward by `dt`, returning fired timers in due order.
    ///
    /// A repeating timer fires once per elapsed period.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        let target = self.now + dt;
        let mut fired = Vec::new();
        loop {
            let Some(next) = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.due <= target)
                .min_by_key(|(_, entry)| (entry.due, entry.id))
                .map(|(idx, _)| idx)
            else {
                break;
            };
            let entry = &mut self.entries[next];
            self.now = entry.due;
            fired.push(entry.id);
            match entry.repeat {
                Repeat::Once => {
                    self.entries.remove(next);
                }
                Repeat::Every(period) => entry.due += period,
            }
        }
        self.now = target;
        fired
    }
}
