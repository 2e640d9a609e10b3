//! Terminal output: log sinks and the execution report printer

pub mod log;
pub mod printer;

// Re-export main types
pub use log::*;
pub use printer::*;
