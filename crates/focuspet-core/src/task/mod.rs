//! Tasks and subtasks.
//!
//! A task is a user-curated goal broken into ordered subtasks. Finished focus
//! sessions tick subtasks off one at a time, see [`TaskTracker`].

mod tracker;

pub use tracker::{TaskQuota, TaskTracker};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One step of a task. Order within the task is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: format!("sub-{}", uuid::Uuid::new_v4()),
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title, never empty
    pub title: String,
    pub subtasks: Vec<Subtask>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            subtasks: Vec::new(),
            created_at,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }

    /// Completed fraction in 0.0..=1.0; 0.0 without subtasks.
    pub fn progress(&self) -> f64 {
        if self.subtasks.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.subtasks.len() as f64
    }

    /// First subtask in list order that is not yet done.
    pub fn first_pending(&self) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| !s.completed)
    }

    pub fn subtask(&self, id: &str) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_counts_completed_subtasks() {
        let mut task = Task::new("Learn English", Utc::now());
        assert_eq!(task.progress(), 0.0);

        task.subtasks.push(Subtask::new("Lesson 1"));
        task.subtasks.push(Subtask::new("Lesson 2"));
        task.subtasks.push(Subtask::new("Lesson 3"));
        task.subtasks.push(Subtask::new("Final test"));
        task.subtasks[0].completed = true;
        task.subtasks[1].completed = true;

        assert_eq!(task.completed_count(), 2);
        assert_eq!(task.progress(), 0.5);
        assert_eq!(task.first_pending().map(|s| s.text.as_str()), Some("Lesson 3"));
    }

    #[test]
    fn ids_are_unique() {
        let a = Subtask::new("a");
        let b = Subtask::new("a");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("sub-"));
    }
}
