//! Deterministic simulation harness.
//!
//! Replays a timestamped script against a [`SessionController`] running on a
//! [`ManualClock`], so whole sessions (25 minutes of ticks, idle periods,
//! tab switches) can be reproduced without waiting on the wall clock.
//!
//! Script format, one step per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! @0    task add Learn English
//! @0    task sub 1 Lesson 3
//! @0    start
//! @12   hide
//! @20   activity
//! @1500
//! ```
//!
//! `@<secs>` is the offset from the start of the simulation; offsets must not
//! decrease and may not exceed [`MAX_OFFSET_SECS`]. A step with no command
//! only lets time pass.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, ManualClock};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::session::{parse_line, Input, SessionController, SessionView};
use crate::stats::StatsSummary;
use crate::storage::Config;

/// Longest scripted run: one year.
pub const MAX_OFFSET_SECS: u64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub at_secs: u64,
    pub line: String,
}

/// A step the controller refused. The simulation carries on.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedStep {
    pub at_secs: u64,
    pub line: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub events: Vec<Event>,
    pub rejected: Vec<RejectedStep>,
    pub snapshot: SessionView,
    pub stats: StatsSummary,
}

/// Parse a script.
///
/// # Errors
///
/// A line without a valid `@<secs>` prefix, an offset beyond
/// [`MAX_OFFSET_SECS`], or an offset earlier than the previous one.
pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    let mut last = 0;
    for (number, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let invalid = |message: String| ValidationError::InvalidValue {
            field: format!("line {}", number + 1),
            message,
        };

        let rest = line
            .strip_prefix('@')
            .ok_or_else(|| invalid("expected '@<secs>' prefix".to_string()))?;
        let (offset, command) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim()),
            None => (rest, ""),
        };
        let at_secs = offset
            .parse::<u64>()
            .map_err(|_| invalid(format!("bad offset '{offset}'")))?;
        if at_secs > MAX_OFFSET_SECS {
            return Err(invalid(format!("offset {at_secs} exceeds {MAX_OFFSET_SECS}")).into());
        }
        if at_secs < last {
            return Err(invalid(format!("offset {at_secs} is before {last}")).into());
        }
        last = at_secs;
        steps.push(ScriptStep {
            at_secs,
            line: command.to_string(),
        });
    }
    Ok(steps)
}

/// Run `steps` from `start`. Time continues to the last step's offset; all
/// timers due by then are fired.
pub fn run_script(config: &Config, steps: &[ScriptStep], start: DateTime<Utc>) -> SimulationReport {
    let clock = ManualClock::new(start);
    let mut controller = SessionController::new(config, clock.clone());
    let mut events = Vec::new();
    let mut rejected = Vec::new();

    for step in steps {
        let Some(at) = offset_instant(start, step.at_secs) else {
            rejected.push(RejectedStep {
                at_secs: step.at_secs,
                line: step.line.clone(),
                error: format!("offset exceeds {MAX_OFFSET_SECS} seconds"),
            });
            continue;
        };
        clock.set(at);
        let outcome = parse_line(&step.line, controller.tasks()).and_then(|input| match input {
            Input::Command(command) => controller.dispatch(command),
            Input::Signal(signal) => Ok(controller.signal(signal)),
            Input::Status | Input::Tasks | Input::Stats | Input::Wait => Ok(controller.poll()),
        });
        match outcome {
            Ok(mut batch) => events.append(&mut batch),
            Err(e) => {
                debug!(at_secs = step.at_secs, line = %step.line, error = %e, "step rejected");
                rejected.push(RejectedStep {
                    at_secs: step.at_secs,
                    line: step.line.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    events.append(&mut controller.poll());

    SimulationReport {
        events,
        rejected,
        snapshot: controller.snapshot(),
        stats: controller.stats(config.stats.average_window_days),
    }
}

fn offset_instant(start: DateTime<Utc>, at_secs: u64) -> Option<DateTime<Utc>> {
    if at_secs > MAX_OFFSET_SECS {
        return None;
    }
    let secs = i64::try_from(at_secs).ok()?;
    start.checked_add_signed(Duration::try_seconds(secs)?)
}

/// Convenience wrapper: parse and run from the Unix epoch.
pub fn simulate(config: &Config, source: &str) -> Result<SimulationReport> {
    let steps = parse_script(source)?;
    let start = ManualClock::default().now();
    Ok(run_script(config, &steps, start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets_and_commands() {
        let steps = parse_script("# demo\n@0 start\n\n@10   hide\n@30\n").unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep {
                    at_secs: 0,
                    line: "start".to_string()
                },
                ScriptStep {
                    at_secs: 10,
                    line: "hide".to_string()
                },
                ScriptStep {
                    at_secs: 30,
                    line: String::new()
                },
            ]
        );
    }

    #[test]
    fn rejects_bad_scripts() {
        assert!(parse_script("start").is_err());
        assert!(parse_script("@x start").is_err());
        assert!(parse_script("@10 start\n@5 pause").is_err());
        assert!(parse_script("@9223372036854775807 start").is_err());
        assert!(parse_script("@18446744073709551615").is_err());
        assert!(parse_script(&format!("@{MAX_OFFSET_SECS} start")).is_ok());
    }

    #[test]
    fn oversized_offsets_are_errors_not_panics() {
        assert!(simulate(&Config::default(), "@9223372036854775807 start").is_err());

        let steps = vec![
            ScriptStep {
                at_secs: 0,
                line: "start".to_string(),
            },
            ScriptStep {
                at_secs: u64::MAX,
                line: "pause".to_string(),
            },
        ];
        let report = run_script(&Config::default(), &steps, ManualClock::default().now());
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].at_secs, u64::MAX);
        assert_eq!(report.snapshot.status, crate::timer::TimerStatus::Running);
    }

    #[test]
    fn rejected_steps_do_not_stop_the_run() {
        let report = simulate(&Config::default(), "@0 task add   \n@0 start\n@5 pause").unwrap();
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.snapshot.remaining_secs, 1495);
    }

    #[test]
    fn tasks_are_addressed_by_position() {
        let script = "@0 task add Thesis\n@0 task sub 1 Outline\n@0 task toggle 1 1\n";
        let report = simulate(&Config::default(), script).unwrap();
        let active = report.snapshot.active_task.unwrap();
        assert_eq!(active.completed_subtasks, 1);
        assert_eq!(active.progress, 1.0);
    }
}
