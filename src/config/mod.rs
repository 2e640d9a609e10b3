//! Host settings parsing and validation
//!
//! This module handles discovery and parsing of the optional kiln.yml settings file.

pub mod parse;
pub mod settings;

// Re-export main types
pub use parse::*;
pub use settings::*;
