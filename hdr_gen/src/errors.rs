use hdr_types::DeclKind;
use thiserror::Error;

/// Result alias used across the emission engine.
pub type EmitResult<T> = Result<T, EmitError>;

/// Invariant violations that abort an emission pass.
///
/// Each of these means the module graph handed to the engine breaks a
/// precondition of header emission; no partial output is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    /// Two top-level value declarations share a name.
    #[error("duplicate top-level declaration '{name}'")]
    DuplicateTopLevelName { name: String },

    /// A generic parameter or associated type showed up where a concrete type was expected.
    #[error("unexpected {kind:?} '{name}' where only concrete types can be referenced")]
    UnexpectedGenericDecl { name: String, kind: DeclKind },

    /// A top-level declaration of a kind the dialect cannot print.
    #[error("unexpected top-level {kind:?} declaration '{name}'")]
    UnexpectedTopLevelDecl { name: String, kind: DeclKind },

    /// A referenced local type declaration has no known way to be declared.
    #[error("unknown local type declaration '{name}' ({kind:?})")]
    UnknownLocalTypeDecl { name: String, kind: DeclKind },

    /// Member dependencies were requested for a declaration that cannot contain them.
    #[error("{kind:?} '{name}' cannot have its members forward declared")]
    UnexpectedContainer { name: String, kind: DeclKind },

    /// A generic type alias was referenced without being importable.
    #[error("generic type alias '{name}' is referenced but not imported")]
    GenericAliasNotImported { name: String },

    /// The work stack no longer holds the declaration that was just written.
    #[error("work stack lost track of '{name}' while writing it")]
    StackCorrupted { name: String },
}
