//! Module Description Loading
//!
//! This crate loads YAML module descriptions from disk and links their
//! name-based references into a [`hdr_types::ModuleGraph`] ready for header
//! emission.

pub mod file;
pub mod resolver;

pub use file::{load_module_file, parse_module_file};
pub use resolver::ModuleLoader;

// Re-export hdr_types for convenience
pub use hdr_types;
