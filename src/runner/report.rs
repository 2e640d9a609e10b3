//! Execution report
//!
//! One entry per task the engine reached, in run order.

use crate::task::same_task;
use std::time::Duration;

/// Outcome of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskExecutionStatus {
    /// Actions ran and succeeded
    Executed,
    /// The task has no actions of its own and only aggregates its dependencies
    Delegated,
    /// A criteria evaluated to false
    Skipped,
    /// An action failed and the failure was not recovered by an error handler
    Failed,
    /// An action failed and the error handlers absorbed the error
    Handled,
}

impl TaskExecutionStatus {
    /// Whether downstream tasks treat this outcome as a success
    pub fn is_success(self) -> bool {
        !matches!(self, TaskExecutionStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub task_name: String,
    pub duration: Duration,
    pub status: TaskExecutionStatus,
}

/// Per-task outcomes for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    entries: Vec<ReportEntry>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, task_name: impl Into<String>, duration: Duration, status: TaskExecutionStatus) {
        self.entries.push(ReportEntry {
            task_name: task_name.into(),
            duration,
            status,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a task, looked up without regard to case
    pub fn entry(&self, task_name: &str) -> Option<&ReportEntry> {
        self.entries
            .iter()
            .find(|entry| same_task(&entry.task_name, task_name))
    }

    /// Status recorded for a task, if the task was reached
    pub fn status_of(&self, task_name: &str) -> Option<TaskExecutionStatus> {
        self.entry(task_name).map(|entry| entry.status)
    }

    /// Whether any task failed without being recovered
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|entry| !entry.status.is_success())
    }

    pub fn total_duration(&self) -> Duration {
        self.entries.iter().map(|entry| entry.duration).sum()
    }
}
