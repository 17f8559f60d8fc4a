//! Single-timeline timer queue.
//!
//! All periodic and one-shot timers of a session share one ordered queue.
//! Entries are drained strictly in due-time order; entries due at the same
//! instant come out in the order they were scheduled.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// One-second countdown pulse for run segment `epoch`.
    CountdownPulse { epoch: u64 },
    /// Watchdog inactivity self-check for run segment `epoch`.
    SelfCheck { epoch: u64 },
    /// End of the post-completion celebrate flash.
    FlashExpiry,
    /// End of the visual alarm pulse.
    AlarmPulseExpiry,
}

impl Timer {
    fn epoch(&self) -> Option<u64> {
        match self {
            Timer::CountdownPulse { epoch } | Timer::SelfCheck { epoch } => Some(*epoch),
            Timer::FlashExpiry | Timer::AlarmPulseExpiry => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(DateTime<Utc>, u64), Timer>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: DateTime<Utc>, timer: Timer) {
        self.seq += 1;
        self.entries.insert((at, self.seq), timer);
    }

    /// Remove and return the earliest entry due at or before `now`.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, Timer)> {
        let (&(at, _), _) = self.entries.first_key_value()?;
        if at > now {
            return None;
        }
        self.entries.pop_first().map(|((at, _), timer)| (at, timer))
    }

    /// Drop every countdown pulse and self-check armed for `epoch`.
    pub fn cancel_run(&mut self, epoch: u64) {
        self.entries.retain(|_, timer| timer.epoch() != Some(epoch));
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.entries.keys().next().map(|(at, _)| *at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
