//! Line-oriented input grammar shared by the interactive driver and
//! scripted simulations.
//!
//! ```text
//! start | pause | reset            timer intents
//! activity | hide                  watchdog signals
//! status | tasks | stats | wait    read-only / let time pass
//! task add <title>
//! task sub <n> <text>
//! task toggle <n> <m>
//! task rm <n>
//! task use <n>
//! ```
//!
//! `<n>` is the 1-based position of a task in the list, `<m>` the 1-based
//! position of a subtask within task `<n>`.

use super::{Command, Signal};
use crate::error::{Result, ValidationError};
use crate::task::TaskTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Signal(Signal),
    Status,
    Tasks,
    Stats,
    /// Only let time pass.
    Wait,
}

/// Parse one line, resolving positions against the current task list.
pub fn parse_line(line: &str, tasks: &TaskTracker) -> Result<Input> {
    let line = line.trim();
    let (verb, rest) = split_word(line);
    let input = match verb {
        "" | "wait" => Input::Wait,
        "start" => Input::Command(Command::Start),
        "pause" => Input::Command(Command::Pause),
        "reset" => Input::Command(Command::Reset),
        "activity" => Input::Signal(Signal::Activity),
        "hide" => Input::Signal(Signal::VisibilityHidden),
        "status" => Input::Status,
        "tasks" => Input::Tasks,
        "stats" => Input::Stats,
        "task" => Input::Command(parse_task(rest, tasks)?),
        other => return Err(invalid("command", format!("unknown command '{other}'"))),
    };
    Ok(input)
}

fn parse_task(args: &str, tasks: &TaskTracker) -> Result<Command> {
    let (verb, rest) = split_word(args);
    let command = match verb {
        "add" => Command::AddTask {
            title: rest.to_string(),
        },
        "sub" => {
            let (n, text) = split_word(rest);
            Command::AddSubtask {
                task_id: task_at(tasks, n)?,
                text: text.to_string(),
            }
        }
        "toggle" => {
            let (n, rest) = split_word(rest);
            let (m, _) = split_word(rest);
            let task_id = task_at(tasks, n)?;
            let subtask_id = subtask_at(tasks, &task_id, m)?;
            Command::ToggleSubtask {
                task_id,
                subtask_id,
            }
        }
        "rm" => Command::DeleteTask {
            task_id: task_at(tasks, split_word(rest).0)?,
        },
        "use" => Command::SelectActiveTask {
            task_id: task_at(tasks, split_word(rest).0)?,
        },
        other => return Err(invalid("task", format!("unknown task action '{other}'"))),
    };
    Ok(command)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn position(raw: &str, field: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(invalid(field, format!("expected a position starting at 1, got '{raw}'"))),
    }
}

fn task_at(tasks: &TaskTracker, raw: &str) -> Result<String> {
    let index = position(raw, "task")?;
    tasks
        .tasks()
        .get(index)
        .map(|t| t.id.clone())
        .ok_or_else(|| invalid("task", format!("no task at position {raw}")))
}

fn subtask_at(tasks: &TaskTracker, task_id: &str, raw: &str) -> Result<String> {
    let index = position(raw, "subtask")?;
    tasks
        .get(task_id)
        .and_then(|t| t.subtasks.get(index))
        .map(|s| s.id.clone())
        .ok_or_else(|| invalid("subtask", format!("no subtask at position {raw}")))
}

fn invalid(field: &str, message: String) -> crate::error::CoreError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
    .into()
}
