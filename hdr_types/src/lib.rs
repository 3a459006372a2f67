//! Header Declaration Model
//!
//! This crate contains the semantic model consumed by the header generator:
//! declarations, resolved type expressions and the module graph that owns
//! them. It also defines the YAML schema modules are described in. It holds
//! pure data structures without any file I/O or emission logic.

pub mod decl;
pub mod file;
pub mod graph;
pub mod types;

// Re-export commonly used types at the crate root
pub use decl::*;
pub use file::*;
pub use graph::*;
pub use types::*;
