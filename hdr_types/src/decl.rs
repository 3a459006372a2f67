use crate::types::TypeExpr;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a declaration inside a [`crate::ModuleGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(pub usize);

/// Stable identifier of a module inside a [`crate::ModuleGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub usize);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Class,
    Protocol,
    Struct,
    Enum,
    Extension,
    Function,
    Var,
    EnumCase,
    TypeAlias,
    GenericParam,
    AssociatedType,
}

impl DeclKind {
    /// Kinds that introduce a type.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            DeclKind::Class
                | DeclKind::Protocol
                | DeclKind::Struct
                | DeclKind::Enum
                | DeclKind::TypeAlias
                | DeclKind::GenericParam
                | DeclKind::AssociatedType
        )
    }

    /// Kinds that introduce a nominal type.
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            DeclKind::Class | DeclKind::Protocol | DeclKind::Struct | DeclKind::Enum
        )
    }

    pub fn is_value_type(self) -> bool {
        matches!(self, DeclKind::Struct | DeclKind::Enum)
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Package,
    Public,
    Open,
}

/// How a foreign class participates in the object model.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ForeignClassKind {
    #[default]
    Normal,
    /// A Core Foundation style type: referenced by typedef, never by `@class`.
    CfType,
    /// An `os_object` type declared through its own header macros.
    OsObject,
    /// Exists only at runtime; extensions of it are never printed.
    RuntimeOnly,
}

/// Link from a declaration to its foreign (externally defined) counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForeignOrigin {
    /// Foreign submodule that owns the counterpart, if known.
    pub owning_module: Option<ModuleId>,
    pub class_kind: ForeignClassKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    pub decl: DeclId,
    pub name: String,
    pub class_bound: bool,
    pub superclass_bound: Option<DeclId>,
    pub protocols: Vec<DeclId>,
}

impl GenericParam {
    /// True if the parameter carries any constraint beyond being a reference type.
    pub fn is_constrained(&self) -> bool {
        self.superclass_bound.is_some() || !self.protocols.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclAttrs {
    /// Representable in the object-oriented dialect.
    pub objc: bool,
    /// Explicitly (not implicitly) marked for the object-oriented dialect.
    pub explicit_objc: bool,
    /// Opted in to the value dialect via an explicit expose attribute.
    pub exposed: bool,
    /// A compatibility alias, always looked through.
    pub compatibility_alias: bool,
    /// Enum that is used as an error type.
    pub error_type: bool,
    /// Name override for the object-oriented dialect.
    pub objc_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclId,
    pub kind: DeclKind,
    pub name: String,
    pub module: ModuleId,
    /// Containing declaration for members.
    pub parent: Option<DeclId>,
    pub access: AccessLevel,
    pub members: Vec<DeclId>,
    pub superclass: Option<DeclId>,
    /// Local protocols for classes and extensions, inherited ones for protocols.
    pub protocols: Vec<DeclId>,
    /// Type being extended, for extensions.
    pub extended: Option<DeclId>,
    pub generic_params: Vec<GenericParam>,
    pub foreign: Option<ForeignOrigin>,
    /// Property type, function signature or alias underlying type.
    pub interface_type: Option<TypeExpr>,
    /// Raw type of an enum.
    pub raw_type: Option<TypeExpr>,
    pub attrs: DeclAttrs,
}

impl Declaration {
    pub fn new(id: DeclId, kind: DeclKind, name: impl Into<String>, module: ModuleId) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            module,
            parent: None,
            access: AccessLevel::default(),
            members: Vec::new(),
            superclass: None,
            protocols: Vec::new(),
            extended: None,
            generic_params: Vec::new(),
            foreign: None,
            interface_type: None,
            raw_type: None,
            attrs: DeclAttrs::default(),
        }
    }

    pub fn has_foreign_node(&self) -> bool {
        self.foreign.is_some()
    }

    pub fn foreign_class_kind(&self) -> ForeignClassKind {
        self.foreign
            .as_ref()
            .map(|origin| origin.class_kind)
            .unwrap_or_default()
    }

    /// Foreign classes that can't be extended from the source module.
    pub fn is_foreign_only(&self) -> bool {
        matches!(
            self.foreign_class_kind(),
            ForeignClassKind::CfType | ForeignClassKind::RuntimeOnly
        )
    }

    pub fn name_for_objc(&self) -> &str {
        self.attrs.objc_name.as_deref().unwrap_or(&self.name)
    }

    pub fn generic_param(&self, index: usize) -> Option<&GenericParam> {
        self.generic_params.get(index)
    }
}
