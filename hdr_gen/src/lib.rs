//! Header Generator
//!
//! Prints the exported declarations of a module as an Objective-C or C++
//! header. Declarations are emitted in a deterministic, dependency-respecting
//! order: every type is forward declared, imported or fully defined before a
//! declaration that needs it.

pub mod dialect;
pub mod emission;
pub mod errors;
pub mod interop;
pub mod output;
pub mod printer;
pub mod type_mapping;
pub mod walker;

pub use dialect::{DialectConfig, EmitOptions, Language};
pub use emission::{ModuleWriter, WrittenModule};
pub use errors::{EmitError, EmitResult};
pub use interop::InteropContext;
pub use output::{
    CxxModuleOutput, ObjcModuleOutput, print_module_contents_cxx, print_module_contents_objc,
    required_access,
};
pub use printer::{DeclPrinter, SyntaxPrinter};
