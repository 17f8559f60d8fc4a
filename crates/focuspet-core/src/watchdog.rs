//! Activity watchdog.
//!
//! Decides, while a session is running, whether the user has walked away.
//! Two things raise the alarm: the viewing surface being hidden (edge
//! triggered, immediate) and a periodic self-check finding no input for longer
//! than the inactivity threshold. Only an input event clears it.
//!
//! The watchdog does not know the timer status; callers pass `running`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::WatchdogConfig;

/// Why the watchdog decided the user is away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistractionReason {
    /// The page / window went to the background.
    Hidden,
    /// No pointer or keyboard input for longer than the threshold.
    Inactive,
}

#[derive(Debug, Clone)]
pub struct ActivityWatchdog {
    distracted: bool,
    last_activity: DateTime<Utc>,
    check_interval: Duration,
    inactivity_threshold: Duration,
}

impl ActivityWatchdog {
    pub fn new(config: &WatchdogConfig, now: DateTime<Utc>) -> Self {
        Self {
            distracted: false,
            last_activity: now,
            check_interval: config.check_interval(),
            inactivity_threshold: config.inactivity_threshold(),
        }
    }

    /// Raw flag. Only meaningful while the session runs; see
    /// [`ActivityWatchdog::is_distracted_while`].
    pub fn distracted(&self) -> bool {
        self.distracted
    }

    /// The distraction state as observed for a given timer status.
    pub fn is_distracted_while(&self, running: bool) -> bool {
        running && self.distracted
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Every `start()` begins undistracted, including resume from pause.
    pub fn clear_for_start(&mut self) {
        if self.distracted {
            debug!("clearing stale distraction on start");
        }
        self.distracted = false;
    }

    /// Pointer movement or key press. The timestamp always updates; the alarm
    /// is cleared only while running. Returns true when focus was regained.
    pub fn on_activity(&mut self, now: DateTime<Utc>, running: bool) -> bool {
        if now > self.last_activity {
            self.last_activity = now;
        }
        if running && self.distracted {
            self.distracted = false;
            debug!("presence proven, distraction cleared");
            return true;
        }
        false
    }

    /// Viewing surface became hidden.
    pub fn on_hidden(&mut self, running: bool) -> Option<DistractionReason> {
        self.raise(running, DistractionReason::Hidden)
    }

    /// Periodic inactivity check.
    pub fn self_check(&mut self, now: DateTime<Utc>, running: bool) -> Option<DistractionReason> {
        if now - self.last_activity > self.inactivity_threshold {
            self.raise(running, DistractionReason::Inactive)
        } else {
            None
        }
    }

    fn raise(&mut self, running: bool, reason: DistractionReason) -> Option<DistractionReason> {
        if !running || self.distracted {
            return None;
        }
        self.distracted = true;
        warn!(reason = ?reason, "user distracted during session");
        Some(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(secs)
    }

    fn watchdog() -> ActivityWatchdog {
        ActivityWatchdog::new(&WatchdogConfig::default(), t(0))
    }

    #[test]
    fn hidden_raises_once_while_running() {
        let mut wd = watchdog();
        assert_eq!(wd.on_hidden(true), Some(DistractionReason::Hidden));
        assert_eq!(wd.on_hidden(true), None);
        assert!(wd.distracted());
    }

    #[test]
    fn hidden_is_ignored_when_not_running() {
        let mut wd = watchdog();
        assert_eq!(wd.on_hidden(false), None);
        assert!(!wd.distracted());
    }

    #[test]
    fn self_check_uses_strict_threshold() {
        let mut wd = watchdog();
        assert_eq!(wd.self_check(t(30), true), None);
        assert_eq!(wd.self_check(t(31), true), Some(DistractionReason::Inactive));
        // Already distracted: no second alarm.
        assert_eq!(wd.self_check(t(60), true), None);
    }

    #[test]
    fn activity_clears_only_while_running() {
        let mut wd = watchdog();
        wd.on_hidden(true);

        assert!(!wd.on_activity(t(5), false));
        assert!(wd.distracted());
        assert_eq!(wd.last_activity(), t(5));

        assert!(wd.on_activity(t(6), true));
        assert!(!wd.distracted());
        assert!(!wd.on_activity(t(7), true));
    }

    #[test]
    fn activity_postpones_inactivity() {
        let mut wd = watchdog();
        wd.on_activity(t(25), true);
        assert_eq!(wd.self_check(t(50), true), None);
        assert_eq!(wd.self_check(t(56), true), Some(DistractionReason::Inactive));
    }

    #[test]
    fn distraction_is_hidden_outside_running() {
        let mut wd = watchdog();
        wd.on_hidden(true);
        assert!(wd.is_distracted_while(true));
        assert!(!wd.is_distracted_while(false));
        wd.clear_for_start();
        assert!(!wd.is_distracted_while(true));
    }
}
