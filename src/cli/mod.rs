//! CLI host
//!
//! This module parses the command line and dispatches to a run, a dry run, or one of the
//! introspection views.

pub mod app;

// Re-export main types
pub use app::*;
