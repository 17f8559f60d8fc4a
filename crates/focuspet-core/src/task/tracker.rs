//! Task progress tracker.
//!
//! Owns the task list and the active-task reference. The reference is either
//! empty or names a task that exists; every mutation below keeps it that way.
//! Session completion feeds in through [`TaskTracker::complete_next_subtask`];
//! nothing here reaches back into the timer.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{Subtask, Task};
use crate::error::{CoreError, Result, ValidationError};
use crate::storage::QuotaConfig;

/// Task creation cap supplied by the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuota {
    pub limit: usize,
    pub unlocked: bool,
}

impl TaskQuota {
    pub fn unlimited() -> Self {
        Self {
            limit: usize::MAX,
            unlocked: true,
        }
    }

    pub fn allows(&self, current: usize) -> bool {
        self.unlocked || current < self.limit
    }
}

impl From<&QuotaConfig> for TaskQuota {
    fn from(config: &QuotaConfig) -> Self {
        Self {
            limit: config.free_task_limit,
            unlocked: config.unlocked,
        }
    }
}

impl Default for TaskQuota {
    fn default() -> Self {
        Self::from(&QuotaConfig::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskTracker {
    tasks: Vec<Task>,
    active: Option<String>,
    quota: TaskQuota,
}

impl TaskTracker {
    pub fn new(quota: TaskQuota) -> Self {
        Self {
            tasks: Vec::new(),
            active: None,
            quota,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Task> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn quota(&self) -> TaskQuota {
        self.quota
    }

    /// The paywall may change the quota at any time; existing tasks are kept.
    pub fn set_quota(&mut self, quota: TaskQuota) {
        self.quota = quota;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a task and make it the active one.
    ///
    /// # Errors
    ///
    /// `ValidationError::EmptyTitle` for blank titles, `CoreError::QuotaExceeded`
    /// when the free cap is reached.
    pub fn add_task(&mut self, title: &str, now: DateTime<Utc>) -> Result<&Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if !self.quota.allows(self.tasks.len()) {
            warn!(limit = self.quota.limit, "task quota reached");
            return Err(CoreError::QuotaExceeded {
                limit: self.quota.limit,
            });
        }

        let task = Task::new(title, now);
        info!(task_id = %task.id, "task created");
        self.active = Some(task.id.clone());
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Append a subtask to the end of `task_id`'s list.
    pub fn add_subtask(&mut self, task_id: &str, text: &str) -> Result<&Subtask> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptySubtaskText.into());
        }
        let task = self.task_mut(task_id)?;
        task.subtasks.push(Subtask::new(text));
        Ok(&task.subtasks[task.subtasks.len() - 1])
    }

    /// Flip a subtask's completed flag. Returns the new value.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<bool> {
        let task = self.task_mut(task_id)?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| ValidationError::SubtaskNotFound {
                task: task_id.to_string(),
                subtask: subtask_id.to_string(),
            })?;
        subtask.completed = !subtask.completed;
        Ok(subtask.completed)
    }

    /// Remove a task. If it was active, the first remaining task in list
    /// order becomes active, or the reference is cleared.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| ValidationError::TaskNotFound(task_id.to_string()))?;
        let removed = self.tasks.remove(index);

        if self.active.as_deref() == Some(task_id) {
            self.active = self.tasks.first().map(|t| t.id.clone());
        }
        info!(task_id, active = ?self.active, "task deleted");
        Ok(removed)
    }

    pub fn select_active(&mut self, task_id: &str) -> Result<()> {
        if self.get(task_id).is_none() {
            return Err(ValidationError::TaskNotFound(task_id.to_string()).into());
        }
        self.active = Some(task_id.to_string());
        Ok(())
    }

    /// Credit a finished session: mark the active task's first pending
    /// subtask done and return it. `None` when there is no active task or
    /// nothing left to do.
    pub fn complete_next_subtask(&mut self) -> Option<Subtask> {
        let active = self.active.clone()?;
        let task = self.tasks.iter_mut().find(|t| t.id == active)?;
        let subtask = task.subtasks.iter_mut().find(|s| !s.completed)?;
        subtask.completed = true;
        Some(subtask.clone())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn task_mut(&mut self, task_id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ValidationError::TaskNotFound(task_id.to_string()).into())
    }
}
