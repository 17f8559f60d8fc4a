//! Countdown engine.
//!
//! A tick-driven state machine. It owns no thread and reads no clock: the
//! caller delivers one `tick()` per elapsed second while the session runs.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle (completion or reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(1500);
//! engine.start();
//! // Once per second:
//! if engine.tick() == TickOutcome::Completed { /* celebrate */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Not started, or just completed / reset.
    Idle,
    Running,
    /// Suspended by the user; remaining time is retained.
    Paused,
}

/// What a single tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Status was not Running; nothing changed.
    Suppressed,
    /// The tick was armed for an earlier run segment and is discarded.
    Stale,
    /// One second was taken off the clock.
    Counted { remaining_secs: u64 },
    /// The countdown crossed 1 -> 0. Status is back to Idle and the
    /// remaining time has been refilled for the next session.
    Completed { sessions_completed: u64 },
}

/// Core countdown engine.
///
/// Invariant: `0 <= remaining_secs <= total_secs` and `total_secs >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    status: TimerStatus,
    remaining_secs: u64,
    total_secs: u64,
    sessions_completed: u64,
    /// Bumped on every transition into Running. Ticks scheduled for an
    /// older run segment are recognised and dropped.
    run_epoch: u64,
}

impl CountdownEngine {
    /// Create an engine for sessions of `total_secs` seconds (at least one).
    pub fn new(total_secs: u64) -> Self {
        let total_secs = total_secs.max(1);
        Self {
            status: TimerStatus::Idle,
            remaining_secs: total_secs,
            total_secs,
            sessions_completed: 0,
            run_epoch: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub fn run_epoch(&self) -> u64 {
        self.run_epoch
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    /// Remaining time as `mm:ss`.
    pub fn format_remaining(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle | Paused -> Running. Returns the status it left, or `None` when
    /// already running.
    pub fn start(&mut self) -> Option<TimerStatus> {
        match self.status {
            TimerStatus::Idle | TimerStatus::Paused => {
                let from = self.status;
                self.status = TimerStatus::Running;
                self.run_epoch += 1;
                info!(
                    remaining_secs = self.remaining_secs,
                    resumed = from == TimerStatus::Paused,
                    "session running"
                );
                Some(from)
            }
            TimerStatus::Running => {
                debug!("start ignored: already running");
                None
            }
        }
    }

    /// Running -> Paused. Remaining time is frozen.
    pub fn pause(&mut self) -> Option<u64> {
        match self.status {
            TimerStatus::Running => {
                self.status = TimerStatus::Paused;
                info!(remaining_secs = self.remaining_secs, "session paused");
                Some(self.remaining_secs)
            }
            other => {
                debug!(status = ?other, "pause ignored: not running");
                None
            }
        }
    }

    /// Any -> Idle with a full session on the clock. Returns the status it left.
    pub fn reset(&mut self) -> TimerStatus {
        let from = self.status;
        self.status = TimerStatus::Idle;
        self.remaining_secs = self.total_secs;
        info!(from = ?from, "session reset");
        from
    }

    /// Deliver one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != TimerStatus::Running {
            return TickOutcome::Suppressed;
        }
        match self.remaining_secs {
            // Unreachable while the invariant holds; never complete twice.
            0 => TickOutcome::Suppressed,
            1 => {
                self.remaining_secs = 0;
                self.complete()
            }
            _ => {
                self.remaining_secs -= 1;
                TickOutcome::Counted {
                    remaining_secs: self.remaining_secs,
                }
            }
        }
    }

    /// Deliver one second scheduled for run segment `epoch`.
    ///
    /// A tick armed before a pause or reset carries an old epoch and is
    /// dropped even if the engine has since been restarted.
    pub fn tick_for(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.run_epoch {
            debug!(epoch, current = self.run_epoch, "stale tick dropped");
            return TickOutcome::Stale;
        }
        self.tick()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> TickOutcome {
        self.sessions_completed += 1;
        self.status = TimerStatus::Idle;
        self.remaining_secs = self.total_secs;
        info!(sessions_completed = self.sessions_completed, "session completed");
        TickOutcome::Completed {
            sessions_completed: self.sessions_completed,
        }
    }
}

/// Format seconds as zero-padded `mm:ss`. Minutes are not wrapped at 60.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_resume() {
        let mut engine = CountdownEngine::new(1500);
        assert_eq!(engine.status(), TimerStatus::Idle);

        assert_eq!(engine.start(), Some(TimerStatus::Idle));
        assert_eq!(engine.status(), TimerStatus::Running);
        engine.tick();

        assert_eq!(engine.pause(), Some(1499));
        assert_eq!(engine.status(), TimerStatus::Paused);

        assert_eq!(engine.start(), Some(TimerStatus::Paused));
        assert_eq!(engine.remaining_secs(), 1499);
    }

    #[test]
    fn illegal_transitions_are_noops() {
        let mut engine = CountdownEngine::new(60);
        assert_eq!(engine.pause(), None);
        assert_eq!(engine.status(), TimerStatus::Idle);

        engine.start();
        let epoch = engine.run_epoch();
        assert_eq!(engine.start(), None);
        assert_eq!(engine.run_epoch(), epoch);
    }

    #[test]
    fn tick_outside_running_never_moves_the_clock() {
        let mut engine = CountdownEngine::new(60);
        assert_eq!(engine.tick(), TickOutcome::Suppressed);
        assert_eq!(engine.remaining_secs(), 60);

        engine.start();
        engine.tick();
        engine.pause();
        for _ in 0..10 {
            assert_eq!(engine.tick(), TickOutcome::Suppressed);
        }
        assert_eq!(engine.remaining_secs(), 59);
    }

    #[test]
    fn completion_fires_once_and_refills() {
        let mut engine = CountdownEngine::new(3);
        engine.start();
        assert_eq!(engine.tick(), TickOutcome::Counted { remaining_secs: 2 });
        assert_eq!(engine.tick(), TickOutcome::Counted { remaining_secs: 1 });
        assert_eq!(
            engine.tick(),
            TickOutcome::Completed {
                sessions_completed: 1
            }
        );
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.remaining_secs(), 3);

        // A duplicate tick for the same boundary is suppressed.
        assert_eq!(engine.tick(), TickOutcome::Suppressed);
        assert_eq!(engine.sessions_completed(), 1);
    }

    #[test]
    fn ticks_from_an_old_run_segment_are_stale() {
        let mut engine = CountdownEngine::new(60);
        engine.start();
        let old = engine.run_epoch();
        engine.pause();
        engine.start();
        assert_eq!(engine.tick_for(old), TickOutcome::Stale);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(
            engine.tick_for(engine.run_epoch()),
            TickOutcome::Counted { remaining_secs: 59 }
        );
    }

    #[test]
    fn reset_refills_from_any_state() {
        let mut engine = CountdownEngine::new(10);
        engine.start();
        engine.tick();
        engine.pause();
        assert_eq!(engine.reset(), TimerStatus::Paused);
        assert_eq!(engine.remaining_secs(), 10);
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn zero_length_sessions_are_clamped() {
        let engine = CountdownEngine::new(0);
        assert_eq!(engine.total_secs(), 1);
    }

    #[test]
    fn format_pads_minutes_and_seconds() {
        assert_eq!(format_mm_ss(1500), "25:00");
        assert_eq!(format_mm_ss(65), "01:05");
        assert_eq!(format_mm_ss(0), "00:00");
    }
}
