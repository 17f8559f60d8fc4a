use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mood::Mood;
use crate::watchdog::DistractionReason;

/// Every state change in the system produces an Event.
/// The notification layer turns them into toasts; the GUI may re-render on any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        /// True when continuing a paused session.
        resumed: bool,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    SessionCompleted {
        /// Text of the subtask credited with this session, if any.
        subtask: Option<String>,
        sessions_completed: u64,
        at: DateTime<Utc>,
    },
    DistractedAlarm {
        reason: DistractionReason,
        at: DateTime<Utc>,
    },
    /// Input arrived while distracted; the pet calms down.
    ResumedFocus {
        at: DateTime<Utc>,
    },
    MoodChanged {
        from: Mood,
        to: Mood,
        at: DateTime<Utc>,
    },
    /// Visual alarm pulse began; it ends with `AlarmPulseCleared`.
    AlarmPulseStarted {
        until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    AlarmPulseCleared {
        at: DateTime<Utc>,
    },
    TaskCreated {
        task_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        /// Active task after the deletion.
        active_task_id: Option<String>,
        at: DateTime<Utc>,
    },
    SubtaskAdded {
        task_id: String,
        subtask_id: String,
        text: String,
        at: DateTime<Utc>,
    },
    SubtaskToggled {
        task_id: String,
        subtask_id: String,
        completed: bool,
        at: DateTime<Utc>,
    },
    ActiveTaskChanged {
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::SessionPaused { at, .. }
            | Event::SessionReset { at }
            | Event::SessionCompleted { at, .. }
            | Event::DistractedAlarm { at, .. }
            | Event::ResumedFocus { at }
            | Event::MoodChanged { at, .. }
            | Event::AlarmPulseStarted { at, .. }
            | Event::AlarmPulseCleared { at }
            | Event::TaskCreated { at, .. }
            | Event::TaskDeleted { at, .. }
            | Event::SubtaskAdded { at, .. }
            | Event::SubtaskToggled { at, .. }
            | Event::ActiveTaskChanged { at, .. } => *at,
        }
    }

    /// Events the notification layer shows as a toast.
    pub fn is_notification(&self) -> bool {
        matches!(
            self,
            Event::SessionStarted { .. }
                | Event::SessionCompleted { .. }
                | Event::DistractedAlarm { .. }
                | Event::ResumedFocus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_tag() {
        let event = Event::DistractedAlarm {
            reason: DistractionReason::Hidden,
            at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "distracted_alarm");
        assert_eq!(json["reason"], "hidden");
    }

    #[test]
    fn notification_filter() {
        let at = DateTime::<Utc>::UNIX_EPOCH;
        assert!(Event::ResumedFocus { at }.is_notification());
        assert!(!Event::AlarmPulseCleared { at }.is_notification());
    }
}
