//! The session: one focus timer, its watchdog, the pet and the task list,
//! driven through a single controller.

mod controller;
pub mod input;
mod view;

pub use controller::{SessionController, SessionState};
pub use input::{parse_line, Input};
pub use view::{ActiveTaskView, SessionView};

use serde::{Deserialize, Serialize};

/// User intents emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Reset,
    AddTask { title: String },
    AddSubtask { task_id: String, text: String },
    ToggleSubtask { task_id: String, subtask_id: String },
    DeleteTask { task_id: String },
    SelectActiveTask { task_id: String },
}

/// Signals from the environment rather than from an explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Pointer movement or key press.
    Activity,
    /// The viewing surface was hidden or backgrounded.
    VisibilityHidden,
}
