//! Pet mood state machine.
//!
//! The mood is derived from the timer status and the watchdog flag by
//! [`derive_mood`], a pure function. The only memory is held in two
//! [`ExpiringFlag`]s: the celebrate flash after a completed session and the
//! visual alarm pulse fired on entering Angry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::MoodConfig;
use crate::timer::TimerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Focused,
    Sleep,
    Angry,
    Celebrate,
}

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Focused => "Focused",
            Mood::Sleep => "Sleep",
            Mood::Angry => "Angry!",
            Mood::Celebrate => "Success!",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "🐶",
            Mood::Focused => "🐱",
            Mood::Sleep => "🐼",
            Mood::Angry => "😡",
            Mood::Celebrate => "🎉",
        }
    }
}

/// Mood for a given state. First match wins.
pub fn derive_mood(status: TimerStatus, distracted: bool, flash_active: bool) -> Mood {
    if flash_active {
        return Mood::Celebrate;
    }
    match (status, distracted) {
        (TimerStatus::Running, true) => Mood::Angry,
        (TimerStatus::Running, false) => Mood::Focused,
        (TimerStatus::Paused, _) => Mood::Sleep,
        (TimerStatus::Idle, _) => Mood::Happy,
    }
}

/// A boolean that turns itself off at a fixed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiringFlag {
    until: Option<DateTime<Utc>>,
}

impl ExpiringFlag {
    /// Turn on until `now + duration`. Returns the expiry instant.
    pub fn arm(&mut self, now: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
        let until = now + duration;
        self.until = Some(until);
        until
    }

    pub fn cancel(&mut self) {
        self.until = None;
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Clear the flag if its deadline has passed. Returns true if it was
    /// cleared by this call. A re-armed flag is not cleared by an older
    /// deadline.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

/// Result of a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoodUpdate {
    /// `(from, to)` when the mood changed.
    pub changed: Option<(Mood, Mood)>,
    /// Deadline of a freshly armed alarm pulse.
    pub pulse_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct MoodTracker {
    current: Mood,
    flash: ExpiringFlag,
    pulse: ExpiringFlag,
    flash_duration: Duration,
    pulse_duration: Duration,
}

impl MoodTracker {
    pub fn new(config: &MoodConfig) -> Self {
        Self {
            current: Mood::Happy,
            flash: ExpiringFlag::default(),
            pulse: ExpiringFlag::default(),
            flash_duration: config.celebrate_flash(),
            pulse_duration: config.alarm_pulse(),
        }
    }

    pub fn current(&self) -> Mood {
        self.current
    }

    pub fn alarm_active(&self, now: DateTime<Utc>) -> bool {
        self.pulse.is_active(now)
    }

    /// Start the celebrate flash. Returns when it ends.
    pub fn flash(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.flash.arm(now, self.flash_duration)
    }

    /// An explicit start or reset overrides a pending celebration.
    pub fn cancel_flash(&mut self) {
        self.flash.cancel();
    }

    pub fn expire_flash(&mut self, now: DateTime<Utc>) -> bool {
        self.flash.expire(now)
    }

    pub fn expire_pulse(&mut self, now: DateTime<Utc>) -> bool {
        self.pulse.expire(now)
    }

    /// Re-derive the mood. Entering Angry from any other mood arms the alarm
    /// pulse; staying Angry does not.
    pub fn recompute(
        &mut self,
        now: DateTime<Utc>,
        status: TimerStatus,
        distracted: bool,
    ) -> MoodUpdate {
        let next = derive_mood(status, distracted, self.flash.is_active(now));
        if next == self.current {
            return MoodUpdate::default();
        }

        let from = self.current;
        self.current = next;
        debug!(from = ?from, to = ?next, "mood changed");

        let pulse_until = (next == Mood::Angry).then(|| self.pulse.arm(now, self.pulse_duration));
        MoodUpdate {
            changed: Some((from, next)),
            pulse_until,
        }
    }
}
