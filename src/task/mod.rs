//! Task definitions and the registry that holds them

pub mod definition;
pub mod registry;

// Re-export main types
pub use definition::*;
pub use registry::*;
