//! Execution context for task running
//!
//! The context is shared by every action, criteria and handler of a run.
//! Tasks run one after another, so it is handed out as `&mut Context` without locking.

use crate::ui::{ConsoleLog, Log};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Execution context passed to user code during a run
pub struct Context {
    /// Current working directory
    pub working_dir: PathBuf,

    /// Arguments given to the host (`--argument key=value`) or set by tasks
    pub arguments: HashMap<String, String>,

    log: Arc<dyn Log>,
}

impl Context {
    /// Create a new context writing to the given log
    pub fn new(log: Arc<dyn Log>) -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            arguments: HashMap::new(),
            log,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set arguments
    pub fn with_arguments(mut self, arguments: HashMap<String, String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Set a single argument
    pub fn set_argument(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.arguments.insert(key.into(), value.into());
    }

    /// Get an argument value
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }

    /// Check whether an argument was given
    pub fn has_argument(&self, key: &str) -> bool {
        self.arguments.contains_key(key)
    }

    /// Read a process environment variable
    pub fn environment_variable(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    /// The log sink for this run
    pub fn log(&self) -> &dyn Log {
        self.log.as_ref()
    }

    /// Shared handle to the log sink
    pub fn log_handle(&self) -> Arc<dyn Log> {
        Arc::clone(&self.log)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Arc::new(ConsoleLog::default()))
    }
}
