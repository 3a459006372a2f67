//! Finds the declarations a type expression mentions.
//!
//! The walker reports each nominal declaration (or foreign type alias) at the
//! top of a type expression once per occurrence, together with whether the
//! reference needs the declaration's full definition or only its name.

use hdr_types::{DeclId, ModuleGraph, TypeExpr};

/// Caller-specific rules for what a reference requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkRule {
    /// Value types referenced directly need their full layout.
    pub by_value_needs_definition: bool,
}

/// One visited declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeReference {
    pub decl: DeclId,
    pub needs_definition: bool,
}

/// Walks `ty` and invokes `callback` for every declaration it references.
///
/// The walk stops descending at each reported node: only the top-level
/// nominal components and generic arguments are reported, never the
/// contents of the referenced declarations.
pub fn walk_type<E>(
    graph: &ModuleGraph,
    ty: &TypeExpr,
    rule: WalkRule,
    callback: &mut dyn FnMut(TypeReference) -> Result<(), E>,
) -> Result<(), E> {
    let mut finder = ReferencedTypeFinder {
        graph,
        rule,
        needs_definition: false,
        callback,
    };
    finder.walk(ty)
}

struct ReferencedTypeFinder<'a, E> {
    graph: &'a ModuleGraph,
    rule: WalkRule,
    needs_definition: bool,
    callback: &'a mut dyn FnMut(TypeReference) -> Result<(), E>,
}

impl<E> ReferencedTypeFinder<'_, E> {
    fn report(&mut self, decl: DeclId, needs_definition: bool) -> Result<(), E> {
        (self.callback)(TypeReference {
            decl,
            needs_definition,
        })
    }

    fn walk(&mut self, ty: &TypeExpr) -> Result<(), E> {
        match ty {
            TypeExpr::Builtin(_) | TypeExpr::GenericParam(_) => Ok(()),
            TypeExpr::Nominal(decl) => {
                let by_value = self.rule.by_value_needs_definition
                    && self.graph.decl(*decl).kind.is_value_type();
                self.report(*decl, self.needs_definition || by_value)
            }
            TypeExpr::Alias(alias) => self.walk_alias(*alias),
            TypeExpr::BoundGeneric { decl, args } => self.walk_bound_generic(*decl, args),
            TypeExpr::Optional(inner) => self.walk(inner),
            TypeExpr::Tuple(elems) => {
                for elem in elems {
                    self.walk(elem)?;
                }
                Ok(())
            }
            TypeExpr::Function { params, result } => {
                for param in params {
                    self.walk(param)?;
                }
                self.walk(result)
            }
        }
    }

    fn walk_alias(&mut self, alias: DeclId) -> Result<(), E> {
        let decl = self.graph.decl(alias);
        if decl.has_foreign_node() && !decl.attrs.compatibility_alias {
            return self.report(alias, self.needs_definition);
        }
        match &decl.interface_type {
            Some(underlying) => self.walk(underlying),
            None => Ok(()),
        }
    }

    fn walk_bound_generic(&mut self, generic: DeclId, args: &[TypeExpr]) -> Result<(), E> {
        self.report(generic, true)?;

        let decl = self.graph.decl(generic);
        let is_foreign_generic = decl.has_foreign_node();
        for (index, arg) in args.iter().enumerate() {
            let constrained = decl
                .generic_param(index)
                .is_some_and(|param| param.is_constrained());
            self.needs_definition = is_foreign_generic && constrained;
            let result = self.walk(arg);
            self.needs_definition = false;
            result?;
        }
        Ok(())
    }
}
