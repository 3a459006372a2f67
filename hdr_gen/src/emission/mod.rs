//! The dependency-ordered emission engine.

pub mod order;
pub mod resolver;
pub mod state;
pub mod writer;

pub use order::{compare_top_level, sort_name, sort_top_level};
pub use resolver::MemberPolicy;
pub use state::{EmissionState, Requirement, SeenType};
pub use writer::{ModuleWriter, WrittenModule};
