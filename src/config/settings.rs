//! Host settings
//!
//! Settings come from an optional `kiln.yml` and are overridden by command-line flags.

use crate::error::{SettingsError, SettingsResult};
use crate::task::DEFAULT_TASK_NAME;
use crate::ui::Verbosity;
use serde::Deserialize;
use std::collections::HashMap;

/// What the host should do with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Run,
    DryRun,
    Description,
    Tree,
}

/// Settings file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Task to run when none is given on the command line
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub verbosity: Option<Verbosity>,

    /// Run only the target, without its dependencies
    #[serde(default)]
    pub exclusive: bool,

    /// Always perform a dry run
    #[serde(default)]
    pub dry_run: bool,

    /// Print the execution report after a run
    #[serde(default = "default_true")]
    pub show_report: bool,

    /// Arguments made available to tasks through the context
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            target: None,
            verbosity: None,
            exclusive: false,
            dry_run: false,
            show_report: true,
            arguments: HashMap::new(),
        }
    }
}

impl Settings {
    /// Target to run, falling back to the default task name
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_TASK_NAME)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity.unwrap_or_default()
    }
}

/// Validate settings read from a file
pub fn validate_settings(settings: &Settings) -> SettingsResult<()> {
    if let Some(target) = &settings.target {
        if target.trim().is_empty() {
            return Err(SettingsError::Invalid("target cannot be empty".to_string()));
        }
    }

    for key in settings.arguments.keys() {
        if key.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "argument names cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
