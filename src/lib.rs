//! Kiln - a build automation engine
//!
//! Tasks are registered with their dependencies, criteria and actions. Kiln builds and
//! validates the dependency graph, computes the run order for a target and runs the tasks
//! one at a time against a shared context, recording every outcome in a report.
//!
//! ```no_run
//! use kiln::task::TaskRegistry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut registry = TaskRegistry::new();
//!     registry.register_task("Clean").unwrap().does(|_| Ok(()));
//!     registry
//!         .register_task("Default")
//!         .unwrap()
//!         .is_dependent_on("Clean");
//!
//!     std::process::exit(kiln::cli::run(registry).await);
//! }
//! ```

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod runner;
pub mod task;
pub mod ui;

// Re-export commonly used types
pub use error::{KilnError, Result};

/// Current version of Kiln
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
