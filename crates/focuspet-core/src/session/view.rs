use chrono::{DateTime, Utc};
use serde::Serialize;

use super::controller::SessionState;
use crate::mood::Mood;
use crate::task::Task;
use crate::timer::TimerStatus;

/// Read-only snapshot for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub status: TimerStatus,
    pub remaining_secs: u64,
    /// `mm:ss`
    pub remaining: String,
    pub total_secs: u64,
    /// 0.0 .. 1.0 through the current session.
    pub progress: f64,
    pub mood: Mood,
    pub mood_label: &'static str,
    pub pet: &'static str,
    pub distracted: bool,
    pub alarm_active: bool,
    pub sessions_completed: u64,
    pub active_task: Option<ActiveTaskView>,
    pub tasks: Vec<Task>,
    /// Tasks that can still be created on the free plan; `None` when unlocked.
    pub tasks_remaining_in_quota: Option<usize>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveTaskView {
    pub id: String,
    pub title: String,
    pub completed_subtasks: usize,
    pub total_subtasks: usize,
    /// 0.0 ..= 1.0
    pub progress: f64,
    /// Subtask the next finished session will be credited to.
    pub next_subtask: Option<String>,
}

impl ActiveTaskView {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            completed_subtasks: task.completed_count(),
            total_subtasks: task.subtasks.len(),
            progress: task.progress(),
            next_subtask: task.first_pending().map(|s| s.text.clone()),
        }
    }
}

impl SessionView {
    pub(crate) fn capture(state: &SessionState, now: DateTime<Utc>) -> Self {
        let countdown = &state.countdown;
        let mood = state.mood.current();
        let quota = state.tasks.quota();
        Self {
            status: countdown.status(),
            remaining_secs: countdown.remaining_secs(),
            remaining: countdown.format_remaining(),
            total_secs: countdown.total_secs(),
            progress: countdown.progress(),
            mood,
            mood_label: mood.label(),
            pet: mood.emoji(),
            distracted: state.watchdog.is_distracted_while(countdown.is_running()),
            alarm_active: state.mood.alarm_active(now),
            sessions_completed: countdown.sessions_completed(),
            active_task: state.tasks.active().map(ActiveTaskView::from_task),
            tasks: state.tasks.tasks().to_vec(),
            tasks_remaining_in_quota: (!quota.unlocked)
                .then(|| quota.limit.saturating_sub(state.tasks.len())),
            at: now,
        }
    }
}
