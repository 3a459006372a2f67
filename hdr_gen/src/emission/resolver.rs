//! Forward declarations and member-delay decisions.
//!
//! Before a container is printed, every type its members mention is either
//! forward declared, required (scheduling its definition first), or, for
//! class members, split off into a batch printed after everything else.

use super::state::Requirement;
use super::writer::ModuleWriter;
use crate::dialect::DialectConfig;
use crate::errors::{EmitError, EmitResult};
use crate::printer::DeclPrinter;
use crate::walker::{WalkRule, walk_type};
use hdr_types::{DeclId, DeclKind, ForeignClassKind, TypeExpr};
use tracing::{trace, warn};

/// What a container does when one of its members needs a type's full definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberPolicy {
    /// Probe without scheduling; if unmet, only that member is delayed.
    DelayMember,
    /// Schedule the type; if unmet, the whole container is retried later.
    DeferContainer,
    /// Like `DeferContainer`, unless the container and the type were both
    /// requested already: then fall back to a forward declaration.
    CycleProbe,
    /// A forward declaration is all that is ever emitted.
    ForwardOnly,
}

impl MemberPolicy {
    pub fn for_container(kind: DeclKind, dialect: &DialectConfig) -> Option<Self> {
        match kind {
            DeclKind::Class => Some(MemberPolicy::DelayMember),
            DeclKind::Extension => Some(MemberPolicy::DeferContainer),
            DeclKind::Protocol => Some(MemberPolicy::CycleProbe),
            DeclKind::Struct | DeclKind::Enum if dialect.value_types_at_top_level => {
                Some(MemberPolicy::ForwardOnly)
            }
            _ => None,
        }
    }
}

impl<P: DeclPrinter> ModuleWriter<'_, P> {
    pub(super) fn walk_rule(&self) -> WalkRule {
        WalkRule {
            by_value_needs_definition: self.options.dialect.by_value_needs_definition,
        }
    }

    /// `require` for the writer: a request that can never make progress
    /// degrades to a forward declaration and counts as satisfied.
    pub(super) fn require(&mut self, decl: DeclId) -> EmitResult<bool> {
        match self.tracker.require(decl) {
            Requirement::Satisfied => Ok(true),
            Requirement::Pending => Ok(false),
            Requirement::Cycle => {
                warn!(
                    decl = %self.graph.decl(decl).name,
                    "unresolvable dependency cycle, emitting a forward declaration instead"
                );
                self.forward_declare_type(decl)?;
                Ok(true)
            }
        }
    }

    /// Walks the interface types of `members` on behalf of `container`.
    ///
    /// Returns false if anything had to be delayed: for classes the delayed
    /// members are recorded and the class can still be printed; for other
    /// containers the caller retries the whole container.
    pub(super) fn forward_declare_member_types(
        &mut self,
        members: &[DeclId],
        container: DeclId,
    ) -> EmitResult<bool> {
        let graph = self.graph;
        let dialect = self.options.dialect;
        let container_decl = graph.decl(container);
        let policy = MemberPolicy::for_container(container_decl.kind, &dialect).ok_or_else(|| {
            EmitError::UnexpectedContainer {
                name: container_decl.name.clone(),
                kind: container_decl.kind,
            }
        })?;
        let rule = self.walk_rule();

        let mut had_delayed_members = false;
        let mut nested_types = Vec::new();
        for &member in members {
            let decl = graph.decl(member);
            if decl.kind == DeclKind::Extension || !self.printer.should_include(member) {
                continue;
            }

            // Nested types are written right after their container.
            if decl.kind.is_type() {
                if !dialect.nested_types_need_explicit_attr || decl.attrs.explicit_objc {
                    nested_types.push(member);
                }
                continue;
            }

            let Some(ty) = decl.interface_type.as_ref() else {
                continue;
            };
            let mut delay_member = false;
            walk_type(graph, ty, rule, &mut |reference| {
                if reference.decl == container {
                    return Ok(());
                }
                let target = if dialect.bridge_types {
                    self.printer.bridged_decl(reference.decl)
                } else {
                    reference.decl
                };

                if reference.needs_definition && graph.decl(target).kind.is_nominal() {
                    match policy {
                        MemberPolicy::DelayMember => {
                            if self.tracker.try_require(target) {
                                return Ok(());
                            }
                            delay_member = true;
                            had_delayed_members = true;
                            // The member is still declared in the class body.
                            if !dialect.value_type_forward_decls {
                                return Ok(());
                            }
                        }
                        MemberPolicy::DeferContainer => {
                            if !self.require(target)? {
                                had_delayed_members = true;
                            }
                            return Ok(());
                        }
                        MemberPolicy::CycleProbe => {
                            if !self.tracker.has_been_requested(container)
                                || !self.tracker.has_been_requested(target)
                            {
                                if !self.require(target)? {
                                    had_delayed_members = true;
                                }
                                return Ok(());
                            }
                            warn!(
                                container = %container_decl.name,
                                decl = %graph.decl(target).name,
                                "protocol dependency cycle, output may be incomplete"
                            );
                        }
                        MemberPolicy::ForwardOnly => {}
                    }
                }

                self.forward_declare_type(target)
            })?;

            if delay_member {
                trace!(member = %decl.name, container = %container_decl.name, "delayed member");
                self.delayed.insert(member);
            }
        }

        self.tracker.work.insert_below_current(&nested_types);
        Ok(!had_delayed_members)
    }

    /// Prints `text` as the forward declaration of `decl` unless one was printed already.
    fn forward_declare_with(&mut self, decl: DeclId, text: impl FnOnce(&Self) -> String) {
        let graph = self.graph;
        if graph.module_of(decl).is_stdlib()
            && (!self.options.dialect.value_type_forward_decls || !self.printer.should_include(decl))
        {
            return;
        }
        if self.tracker.is_forward_declared(decl) {
            return;
        }
        let text = text(self);
        self.streams.main.push_str(&text);
        self.tracker.mark_forward_declared(decl);
    }

    /// `@class` declaration, or false if the class can't be named that way.
    fn forward_declare_class(&mut self, class: DeclId) -> bool {
        let decl = self.graph.decl(class);
        if !decl.attrs.objc
            || matches!(
                decl.foreign_class_kind(),
                ForeignClassKind::CfType | ForeignClassKind::OsObject
            )
        {
            return false;
        }
        self.forward_declare_with(class, |writer| {
            format!("@class {};\n", writer.graph.decl(class).name_for_objc())
        });
        true
    }

    fn raw_type_spelling(&self, decl: DeclId) -> String {
        let raw = self.graph.decl(decl).raw_type.clone();
        let raw = raw.unwrap_or_else(|| TypeExpr::Builtin("Int".into()));
        self.printer.print_type(&raw)
    }

    /// Name-only declaration of a value type in the C++ dialect.
    pub(super) fn forward_declare_value_type(&mut self, decl: DeclId) {
        self.forward_declare_with(decl, |writer| {
            let d = writer.graph.decl(decl);
            match (d.kind, &d.raw_type) {
                (DeclKind::Enum, Some(_)) => {
                    format!("enum class {} : {};\n", d.name, writer.raw_type_spelling(decl))
                }
                (DeclKind::Enum, None) => format!("enum class {};\n", d.name),
                _ => format!("class {};\n", d.name),
            }
        });
    }

    /// Marks a foreign struct usable in generic contexts, once per pass.
    fn emit_foreign_type_traits(&mut self, decl: DeclId) {
        if !self.seen_foreign_types.insert(decl) {
            return;
        }
        let graph = self.graph;
        let name = format!("{}::{}", graph.module_of(decl).name, graph.decl(decl).name);
        self.streams.main.push_str(&format!(
            "namespace hdr {{\ntemplate<>\nstatic inline const constexpr bool isUsableInGenericContext<{}> = true;\n}} // namespace hdr\n",
            name
        ));
    }

    /// Makes `decl` nameable in the header: forward declares it or records
    /// the import that provides it.
    pub(super) fn forward_declare_type(&mut self, decl: DeclId) -> EmitResult<()> {
        let graph = self.graph;
        let d = graph.decl(decl);

        if self.options.dialect.value_type_forward_decls {
            if d.kind.is_value_type() {
                if !self.tracker.imports.add_import(decl) {
                    self.forward_declare_value_type(decl);
                } else if d.kind == DeclKind::Struct && d.has_foreign_node() {
                    self.emit_foreign_type_traits(decl);
                }
            }
            return Ok(());
        }

        match d.kind {
            DeclKind::Class => {
                if !self.forward_declare_class(decl) {
                    self.tracker.imports.add_import(decl);
                }
            }
            DeclKind::Protocol => {
                self.forward_declare_with(decl, |writer| {
                    format!("@protocol {};\n", writer.graph.decl(decl).name_for_objc())
                });
            }
            DeclKind::TypeAlias => {
                let imported = d.has_foreign_node() && self.tracker.imports.add_import(decl);
                if !imported && !d.generic_params.is_empty() {
                    return Err(EmitError::GenericAliasNotImported {
                        name: d.name.clone(),
                    });
                }
            }
            _ if self.tracker.imports.add_import(decl) => {}
            DeclKind::Enum => {
                self.forward_declare_with(decl, |writer| {
                    format!(
                        "enum {} : {};\n",
                        writer.graph.decl(decl).name_for_objc(),
                        writer.raw_type_spelling(decl)
                    )
                });
            }
            DeclKind::GenericParam | DeclKind::AssociatedType => {
                return Err(EmitError::UnexpectedGenericDecl {
                    name: d.name.clone(),
                    kind: d.kind,
                });
            }
            DeclKind::Struct if graph.module_of(decl).is_stdlib() => {}
            kind => {
                return Err(EmitError::UnknownLocalTypeDecl {
                    name: d.name.clone(),
                    kind,
                });
            }
        }
        Ok(())
    }
}
