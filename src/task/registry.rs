//! Task registry

use crate::error::{ConfigError, ConfigResult};
use crate::task::{TaskBuilder, TaskDefinition};
use std::collections::HashMap;

/// Name of the task used when no target is given
pub const DEFAULT_TASK_NAME: &str = "Default";

/// Insertion-ordered collection of tasks keyed by case-insensitive name
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskDefinition>,
    index: HashMap<String, usize>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task and return a builder for it
    pub fn register_task(&mut self, name: impl Into<String>) -> ConfigResult<TaskBuilder<'_>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidTaskName);
        }

        let key = task_key(&name);
        if self.index.contains_key(&key) {
            return Err(ConfigError::DuplicateTask(name));
        }

        let position = self.tasks.len();
        self.index.insert(key, position);
        self.tasks.push(TaskDefinition::new(name));

        Ok(TaskBuilder::new(&mut self.tasks[position]))
    }

    /// Find a task by name, ignoring case
    pub fn find_task(&self, name: &str) -> Option<&TaskDefinition> {
        self.index
            .get(&task_key(name))
            .map(|&position| &self.tasks[position])
    }

    /// All tasks in registration order
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// The task named `Default`, if one is registered
    pub fn default_task(&self) -> Option<&TaskDefinition> {
        self.find_task(DEFAULT_TASK_NAME)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Lookup key for a task name; names differing only by case share a key
pub(crate) fn task_key(name: &str) -> String {
    name.to_lowercase()
}

/// Whether two task names refer to the same task
pub(crate) fn same_task(a: &str, b: &str) -> bool {
    a == b || task_key(a) == task_key(b)
}
