use rand::Rng;
use tracing::{info, warn};

use super::types::{PROGRESS_DONE, Task, TaskKind, TaskStatus};
use crate::error::{Result, SimError};

/// Smallest progress increment per progress tick (%).
const STEP_MIN: u8 = 1;
/// Largest progress increment per progress tick (%).
const STEP_MAX: u8 = 5;

/// Ordered collection of queued tasks.
///
/// Tasks keep insertion order. Progress only moves through
/// [`TaskLedger::advance_progress`], which the owner drives from its own
/// timer.
#[derive(Debug, Clone, Default)]
pub struct TaskLedger {
    tasks: Vec<Task>,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a new pending task.
    ///
    /// The id is `task_{n+1}` for a ledger of `n` tasks. After deletions that
    /// id may still be held by a live task, in which case the number is
    /// bumped until it is free.
    ///
    /// # Returns
    ///
    /// The id of the new task.
    pub fn add_task(&mut self, kind: TaskKind) -> String {
        let mut n = self.tasks.len() + 1;
        let mut task_id = format!("task_{n}");
        while self.position(&task_id).is_some() {
            n += 1;
            task_id = format!("task_{n}");
        }

        info!(%task_id, kind = kind.name(), "task queued");
        self.tasks.push(Task::new(task_id.clone(), kind));
        task_id
    }

    /// Moves a task to `Running`.
    ///
    /// Completed tasks stay completed.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TaskNotFound`] for unknown ids.
    pub fn start_task(&mut self, task_id: &str) -> Result<()> {
        let task = self.get_mut(task_id)?;
        if task.status == TaskStatus::Pending {
            task.status = TaskStatus::Running;
            info!(task_id, "task started");
        }
        Ok(())
    }

    /// Removes a task regardless of its status.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TaskNotFound`] for unknown ids.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        let idx = self.position(task_id).ok_or_else(|| not_found(task_id))?;
        info!(task_id, "task deleted");
        Ok(self.tasks.remove(idx))
    }

    /// Advances every running task by a random 1..=5 %, saturating at 100.
    ///
    /// Tasks reaching 100 % become `Completed`. Pending and completed tasks
    /// are untouched.
    ///
    /// # Returns
    ///
    /// Ids of the tasks that completed during this call.
    pub fn advance_progress(&mut self, rng: &mut impl Rng) -> Vec<String> {
        let mut completed = Vec::new();
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.status == TaskStatus::Running)
        {
            let step = rng.random_range(STEP_MIN..=STEP_MAX);
            task.progress = task.progress.saturating_add(step).min(PROGRESS_DONE);
            if task.progress >= PROGRESS_DONE {
                task.status = TaskStatus::Completed;
                info!(task_id = %task.task_id, "task completed");
                completed.push(task.task_id.clone());
            }
        }
        completed
    }

    /// Looks up a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TaskNotFound`] for unknown ids.
    pub fn get(&self, task_id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.task_id == task_id)
            .ok_or_else(|| not_found(task_id))
    }

    fn get_mut(&mut self, task_id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or_else(|| not_found(task_id))
    }

    fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.task_id == task_id)
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Number of tasks currently running.
    pub fn running(&self) -> usize {
        self.iter()
            .filter(|t| t.status == TaskStatus::Running)
            .count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn not_found(task_id: &str) -> SimError {
    warn!(task_id, "unknown task");
    SimError::TaskNotFound(task_id.to_string())
}
