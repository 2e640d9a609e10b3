//! Log sinks
//!
//! Everything the engine, the strategies and the host print goes through a [`Log`].
//! The sink is passed in explicitly; there is no global logger.

use colored::Colorize;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
    Diagnostic = 4,
}

impl Verbosity {
    /// Parse a verbosity name as accepted on the command line
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "silent" => Some(Verbosity::Silent),
            "quiet" | "minimal" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "diagnostic" | "debug" => Some(Verbosity::Diagnostic),
            _ => None,
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Normal
    }
}

/// Severity of a single log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Information,
    Verbose,
    Debug,
}

impl LogLevel {
    /// Lowest verbosity at which this level is shown
    pub fn threshold(self) -> Verbosity {
        match self {
            LogLevel::Error | LogLevel::Warning => Verbosity::Quiet,
            LogLevel::Information => Verbosity::Normal,
            LogLevel::Verbose => Verbosity::Verbose,
            LogLevel::Debug => Verbosity::Diagnostic,
        }
    }
}

/// A log sink
pub trait Log: Send + Sync {
    /// Current verbosity of the sink
    fn verbosity(&self) -> Verbosity;

    /// Write a line unconditionally
    fn write(&self, level: LogLevel, message: &str);

    /// Write a line if the level is visible at the current verbosity
    fn log(&self, level: LogLevel, message: &str) {
        if self.verbosity() >= level.threshold() {
            self.write(level, message);
        }
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn information(&self, message: &str) {
        self.log(LogLevel::Information, message);
    }

    fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
}

/// Log sink writing colored lines to stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    verbosity: Verbosity,
}

impl ConsoleLog {
    pub fn new(verbosity: Verbosity) -> Self {
        ConsoleLog { verbosity }
    }
}

impl Log for ConsoleLog {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => eprintln!("{} {}", "[ERROR]".red().bold(), message.red()),
            LogLevel::Warning => eprintln!("{} {}", "[WARN]".yellow().bold(), message.yellow()),
            LogLevel::Information => eprintln!("{}", message),
            LogLevel::Verbose => eprintln!("{}", message.dimmed()),
            LogLevel::Debug => eprintln!("{} {}", "[DEBUG]".dimmed(), message.dimmed()),
        }
    }
}

/// Log sink that keeps every visible line in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    verbosity: Verbosity,
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLog {
    pub fn new(verbosity: Verbosity) -> Self {
        MemoryLog {
            verbosity,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// All recorded lines with their level
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded messages only
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, message)| message).collect()
    }

    /// Whether any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, message)| message.contains(needle))
    }
}

impl Log for MemoryLog {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert!(Verbosity::Diagnostic > Verbosity::Verbose);
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
        assert!(Verbosity::Quiet > Verbosity::Silent);
    }

    #[test]
    fn test_verbosity_parse() {
        assert_eq!(Verbosity::parse("Verbose"), Some(Verbosity::Verbose));
        assert_eq!(Verbosity::parse("minimal"), Some(Verbosity::Quiet));
        assert_eq!(Verbosity::parse("debug"), Some(Verbosity::Diagnostic));
        assert_eq!(Verbosity::parse("loud"), None);
    }

    #[test]
    fn test_memory_log_filters_by_verbosity() {
        let log = MemoryLog::new(Verbosity::Normal);
        log.error("bad");
        log.information("hello");
        log.verbose("details");
        log.debug("internals");

        assert_eq!(log.messages(), vec!["bad", "hello"]);
        assert!(log.contains("hel"));
        assert!(!log.contains("details"));
    }

    #[test]
    fn test_silent_drops_everything() {
        let log = MemoryLog::new(Verbosity::Silent);
        log.error("bad");
        log.warning("careful");
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_quiet_keeps_warnings() {
        let log = MemoryLog::new(Verbosity::Quiet);
        log.warning("careful");
        log.information("hello");
        assert_eq!(log.lines(), vec![(LogLevel::Warning, "careful".to_string())]);
    }
}
