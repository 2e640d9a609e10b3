//! Task execution engine
//!
//! This module handles running tasks in dependency order, the strategies that decide what
//! running means, the per-run report, and the read-only description and tree views.

pub mod context;
pub mod engine;
pub mod introspect;
pub mod report;
pub mod strategy;

// Re-export main types
pub use context::*;
pub use engine::*;
pub use introspect::*;
pub use report::*;
pub use strategy::*;
