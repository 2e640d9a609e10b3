//! Error types for Kiln

use crate::runner::ExecutionReport;
use std::io;
use thiserror::Error;

/// Result type alias for Kiln operations
pub type Result<T> = std::result::Result<T, KilnError>;

/// Main error type for Kiln
#[derive(Error, Debug)]
pub enum KilnError {
    /// Task registration, graph and target errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Host settings file errors
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl KilnError {
    /// Process exit code a host should use for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KilnError::Execution(_) => 1,
            KilnError::Config(_) => 2,
            KilnError::Settings(_) | KilnError::Io(_) | KilnError::Yaml(_) => 3,
        }
    }

    /// The partial execution report, if the error happened during a run
    pub fn report(&self) -> Option<&ExecutionReport> {
        match self {
            KilnError::Execution(e) => Some(e.report()),
            KilnError::Config(ConfigError::CriteriaFailed { report, .. }) => Some(report),
            _ => None,
        }
    }
}

/// Task registration and graph validation errors
///
/// These are raised before any task action runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Task name cannot be empty")]
    InvalidTaskName,

    #[error("Another task with the name '{0}' has already been added")]
    DuplicateTask(String),

    #[error("Task '{task}' is dependent on task '{dependency}' which does not exist")]
    MissingDependency { task: String, dependency: String },

    #[error("Task '{task}' is a dependee of task '{dependee}' which does not exist")]
    MissingDependee { task: String, dependee: String },

    #[error("Task dependency on self detected: '{0}'")]
    SelfDependency(String),

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("The target '{0}' was not found")]
    TargetNotFound(String),

    /// Raised mid-run; `report` holds the tasks reached before it
    #[error("Could not evaluate criteria for task '{task}': {source}")]
    CriteriaFailed {
        task: String,
        source: anyhow::Error,
        report: ExecutionReport,
    },
}

/// Errors that abort a run after it has started
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{task}' failed: {source}")]
    TaskFailed {
        task: String,
        source: anyhow::Error,
        report: ExecutionReport,
    },

    #[error("Setup failed: {source}")]
    SetupFailed {
        source: anyhow::Error,
        report: ExecutionReport,
    },

    #[error("Teardown failed: {source}")]
    TeardownFailed {
        source: anyhow::Error,
        report: ExecutionReport,
    },
}

impl ExecutionError {
    /// Report of the tasks that ran before the run was aborted
    pub fn report(&self) -> &ExecutionReport {
        match self {
            ExecutionError::TaskFailed { report, .. }
            | ExecutionError::SetupFailed { report, .. }
            | ExecutionError::TeardownFailed { report, .. } => report,
        }
    }
}

/// Host settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to find settings file (searched: {0})")]
    NotFound(String),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for settings operations
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
