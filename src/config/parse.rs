//! Settings file parsing and discovery

use crate::config::settings::{validate_settings, Settings};
use crate::error::{KilnError, SettingsError, SettingsResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file names to search for
const SETTINGS_FILE_NAMES: &[&str] = &["kiln.yml", "kiln.yaml"];

/// Find the settings file by searching current and parent directories
pub fn find_settings_file() -> SettingsResult<PathBuf> {
    find_settings_file_from(env::current_dir().map_err(|e| {
        SettingsError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the settings file starting from a specific directory
pub fn find_settings_file_from(start_dir: PathBuf) -> SettingsResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in SETTINGS_FILE_NAMES {
            let settings_path = current_dir.join(file_name);
            searched_paths.push(settings_path.display().to_string());

            if settings_path.is_file() {
                return Ok(settings_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(SettingsError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a settings file from a path
pub fn parse_settings_file(path: &Path) -> Result<Settings, KilnError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        SettingsError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_settings(&contents)
}

/// Parse and validate settings from a string
pub fn parse_settings(yaml: &str) -> Result<Settings, KilnError> {
    // An empty file is a valid, empty settings document
    if yaml.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(yaml)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Load settings from `path` if given, otherwise from a discovered file, otherwise defaults
pub fn load_settings(path: Option<&Path>) -> Result<Settings, KilnError> {
    match path {
        Some(path) => parse_settings_file(path),
        None => match find_settings_file() {
            Ok(found) => parse_settings_file(&found),
            Err(SettingsError::NotFound(_)) => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        },
    }
}
