//! Syntax printers: render one declaration once the engine decided it is safe to print.

pub mod cxx;
pub mod objc;

use crate::dialect::{EmitOptions, Language};
use crate::type_mapping::PrimitiveTypeMapping;
use hdr_types::{DeclId, DeclKind, ModuleGraph, ModuleId, TypeExpr};
use indexmap::IndexSet;

/// Members that were split off their container and are printed later in a batch.
pub type DelayedMembers = IndexSet<DeclId>;

/// Output streams of one emission pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmitStreams {
    /// Declarations in dependency order.
    pub main: String,
    /// Declarations that must precede the module's visible contents.
    pub prologue: String,
    /// Definitions printed after everything else.
    pub out_of_line: String,
}

/// What the printer may need to know about the pass while printing a declaration.
#[derive(Debug, Clone, Copy)]
pub struct PrintContext<'a> {
    pub delayed: &'a DelayedMembers,
    /// Extensions whose members are printed together with the declaration.
    pub extensions: &'a [DeclId],
}

/// The printing capability the emission engine drives.
pub trait DeclPrinter {
    /// Visibility and export filter.
    fn should_include(&self, decl: DeclId) -> bool;

    /// True if the extension would print nothing.
    fn is_empty_extension(&self, ext: DeclId) -> bool;

    /// Counterpart a referenced type is printed as.
    fn bridged_decl(&self, decl: DeclId) -> DeclId {
        decl
    }

    fn print_type(&self, ty: &TypeExpr) -> String;

    fn print(&mut self, decl: DeclId, ctx: &PrintContext<'_>, streams: &mut EmitStreams);

    /// Prints members of one container that were delayed past the container itself.
    fn print_ad_hoc_category(&mut self, members: &[DeclId], streams: &mut EmitStreams);
}

/// Default printer for both dialects.
#[derive(Debug, Clone)]
pub struct SyntaxPrinter<'g> {
    pub(crate) graph: &'g ModuleGraph,
    pub(crate) module: ModuleId,
    pub(crate) options: EmitOptions,
    pub(crate) type_mapping: PrimitiveTypeMapping,
}

impl<'g> SyntaxPrinter<'g> {
    pub fn new(graph: &'g ModuleGraph, module: ModuleId, options: EmitOptions) -> Self {
        Self {
            graph,
            module,
            options,
            type_mapping: PrimitiveTypeMapping::new(),
        }
    }

    pub(crate) fn language(&self) -> Language {
        self.options.dialect.language
    }

    pub(crate) fn module_name(&self) -> &str {
        &self.graph.module(self.module).name
    }

    /// Members printed inside their container's body.
    pub(crate) fn printable_members(&self, container: DeclId) -> Vec<DeclId> {
        self.graph
            .decl(container)
            .members
            .iter()
            .copied()
            .filter(|member| {
                let kind = self.graph.decl(*member).kind;
                matches!(kind, DeclKind::Var | DeclKind::Function | DeclKind::EnumCase)
                    && self.should_include(*member)
            })
            .collect()
    }

    pub(crate) fn included_protocols(&self, decl: DeclId) -> Vec<DeclId> {
        self.graph
            .decl(decl)
            .protocols
            .iter()
            .copied()
            .filter(|proto| self.should_include(*proto))
            .collect()
    }
}

impl DeclPrinter for SyntaxPrinter<'_> {
    fn should_include(&self, decl: DeclId) -> bool {
        let d = self.graph.decl(decl);
        if d.access < self.options.access {
            return false;
        }
        match self.language() {
            Language::ObjC => d.attrs.objc || d.has_foreign_node(),
            Language::Cxx => !self.options.requires_exposed_attribute || d.attrs.exposed,
        }
    }

    fn is_empty_extension(&self, ext: DeclId) -> bool {
        self.printable_members(ext).is_empty() && self.included_protocols(ext).is_empty()
    }

    fn print_type(&self, ty: &TypeExpr) -> String {
        match self.language() {
            Language::ObjC => objc::print_type(self, ty),
            Language::Cxx => cxx::print_type(self, ty),
        }
    }

    fn print(&mut self, decl: DeclId, ctx: &PrintContext<'_>, streams: &mut EmitStreams) {
        match self.language() {
            Language::ObjC => objc::print_decl(self, decl, ctx, streams),
            Language::Cxx => cxx::print_decl(self, decl, ctx, streams),
        }
    }

    fn print_ad_hoc_category(&mut self, members: &[DeclId], streams: &mut EmitStreams) {
        match self.language() {
            Language::ObjC => objc::print_ad_hoc_category(self, members, streams),
            Language::Cxx => cxx::print_ad_hoc_category(self, members, streams),
        }
    }
}
