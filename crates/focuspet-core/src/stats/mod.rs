//! Statistics summary.
//!
//! Aggregate figures derived from the completed-session counter. There is no
//! day-by-day history: the counter is the only input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_sessions: u64,
    pub focused_minutes: u64,
    /// `"{h}h {m}m"`
    pub focused_display: String,
    pub window_days: u32,
    /// Sessions per day over the window, rounded to one decimal.
    pub average_per_day: f64,
}

impl StatsSummary {
    /// Figures for `sessions` completed sessions of `session_secs` each,
    /// averaged over `window_days` (treated as at least one day).
    pub fn from_counter(sessions: u64, session_secs: u64, window_days: u32) -> Self {
        let focused_minutes = sessions.saturating_mul(session_secs) / 60;
        let window_days = window_days.max(1);
        let average = sessions as f64 / f64::from(window_days);
        Self {
            total_sessions: sessions,
            focused_minutes,
            focused_display: format!("{}h {}m", focused_minutes / 60, focused_minutes % 60),
            window_days,
            average_per_day: (average * 10.0).round() / 10.0,
        }
    }
}
