use crate::decl::DeclId;

/// A resolved interface type.
///
/// Nominal references point at declarations in the owning [`crate::ModuleGraph`];
/// structural types carry their components inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A builtin scalar, spelled by the primitive type table of each dialect.
    Builtin(String),
    Nominal(DeclId),
    /// A type alias; the alias declaration carries the underlying type.
    Alias(DeclId),
    BoundGeneric { decl: DeclId, args: Vec<TypeExpr> },
    Optional(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Function { params: Vec<TypeExpr>, result: Box<TypeExpr> },
    /// Reference to a generic parameter declaration in scope.
    GenericParam(DeclId),
}

impl TypeExpr {
    pub fn void() -> Self {
        TypeExpr::Tuple(Vec::new())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeExpr::Tuple(elems) if elems.is_empty())
    }

    /// The nominal declaration this type directly names, looking through optionals.
    pub fn nominal_decl(&self) -> Option<DeclId> {
        match self {
            TypeExpr::Nominal(id) | TypeExpr::Alias(id) => Some(*id),
            TypeExpr::BoundGeneric { decl, .. } => Some(*decl),
            TypeExpr::Optional(inner) => inner.nominal_decl(),
            _ => None,
        }
    }
}
