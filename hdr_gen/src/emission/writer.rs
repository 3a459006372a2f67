use super::order::{collect_top_level, sort_top_level};
use super::state::{EmissionTracker, ImportTracker, WorkStack};
use crate::dialect::{EmitOptions, Language};
use crate::errors::{EmitError, EmitResult};
use crate::interop::InteropContext;
use crate::printer::{DeclPrinter, DelayedMembers, EmitStreams, PrintContext};
use crate::walker::walk_type;
use hdr_types::{DeclId, DeclKind, ModuleGraph, ModuleId};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace};

/// Everything one emission pass produced.
#[derive(Debug, Clone, Default)]
pub struct WrittenModule {
    /// Declarations, then ad hoc batches, then out-of-line definitions.
    pub text: String,
    /// Text that must precede the module's contents.
    pub prologue: String,
    pub imports: BTreeSet<ModuleId>,
    pub depends_on_stdlib: bool,
    /// Top-level declarations in the order they were seeded.
    pub order: Vec<DeclId>,
    /// Members printed in ad hoc batches, in batch order.
    pub delayed: Vec<DeclId>,
}

/// Writes the contents of one module.
///
/// A writer performs exactly one pass: [`ModuleWriter::write`] consumes it.
pub struct ModuleWriter<'g, P: DeclPrinter> {
    pub(super) graph: &'g ModuleGraph,
    pub(super) module: ModuleId,
    pub(super) options: EmitOptions,
    pub(super) printer: P,
    pub(super) tracker: EmissionTracker<'g>,
    pub(super) streams: EmitStreams,
    pub(super) delayed: DelayedMembers,
    pub(super) seen_foreign_types: HashSet<DeclId>,
    /* Taken from the caller for the duration of the pass */
    pub(super) interop: InteropContext,
}

impl<'g, P: DeclPrinter> ModuleWriter<'g, P> {
    pub fn new(graph: &'g ModuleGraph, module: ModuleId, printer: P, options: EmitOptions) -> Self {
        let imports = ImportTracker::new(graph, module, options.dialect);
        Self {
            graph,
            module,
            options,
            printer,
            tracker: EmissionTracker::new(imports, WorkStack::default()),
            streams: EmitStreams::default(),
            delayed: DelayedMembers::default(),
            seen_foreign_types: HashSet::new(),
            interop: InteropContext::default(),
        }
    }

    fn is_objc(&self) -> bool {
        self.options.dialect.language == Language::ObjC
    }

    fn print(&mut self, decl: DeclId) {
        let extensions = self.interop.extensions_for(decl);
        let ctx = PrintContext {
            delayed: &self.delayed,
            extensions,
        };
        self.printer.print(decl, &ctx, &mut self.streams);
    }

    fn write_class(&mut self, class: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        if self.tracker.imports.add_import(class) || self.tracker.is_defined(class) {
            return Ok(true);
        }
        let decl = graph.decl(class);

        let mut satisfied = true;
        if let Some(superclass) = decl.superclass {
            satisfied &= self.require(superclass)?;
        }
        if self.options.dialect.conformances_are_prerequisites {
            for &proto in &decl.protocols {
                if self.printer.should_include(proto) {
                    satisfied &= self.require(proto)?;
                }
            }
        }
        if !satisfied {
            return Ok(false);
        }

        self.forward_declare_member_types(&decl.members, class)?;
        self.tracker.mark_defined(class);
        self.streams.main.push('\n');
        self.print(class);
        Ok(true)
    }

    fn write_protocol(&mut self, proto: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        if self.tracker.imports.add_import(proto) || self.tracker.is_defined(proto) {
            return Ok(true);
        }
        let decl = graph.decl(proto);

        let mut satisfied = true;
        for &inherited in &decl.protocols {
            if self.printer.should_include(inherited) {
                satisfied &= self.require(inherited)?;
            }
        }
        if !satisfied || !self.forward_declare_member_types(&decl.members, proto)? {
            return Ok(false);
        }

        self.tracker.mark_defined(proto);
        self.streams.main.push('\n');
        self.print(proto);
        Ok(true)
    }

    fn write_extension(&mut self, ext: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        if self.printer.is_empty_extension(ext) {
            return Ok(true);
        }
        let decl = graph.decl(ext);

        let mut satisfied = true;
        if let Some(base) = graph.self_class_decl(ext) {
            satisfied &= self.require(base)?;
        }
        for &proto in &decl.protocols {
            if self.printer.should_include(proto) {
                satisfied &= self.require(proto)?;
            }
        }
        // Member forward declarations are printed only once the base is in
        // place so they end up right above the extension.
        if !satisfied || !self.forward_declare_member_types(&decl.members, ext)? {
            return Ok(false);
        }

        self.tracker.mark_defined(ext);
        self.streams.main.push('\n');
        self.print(ext);
        Ok(true)
    }

    fn write_enum(&mut self, enum_decl: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        if self.tracker.imports.add_import(enum_decl) {
            return Ok(true);
        }
        let decl = graph.decl(enum_decl);

        if self.options.dialect.value_types_at_top_level {
            self.forward_declare_member_types(&decl.members, enum_decl)?;
            self.forward_declare_value_type(enum_decl);
        }
        if self.tracker.is_defined(enum_decl) {
            return Ok(true);
        }

        self.tracker.mark_defined(enum_decl);
        self.print(enum_decl);

        if self.is_objc() && decl.attrs.error_type {
            let has_domain_case = decl.members.iter().any(|member| {
                let case = graph.decl(*member);
                case.kind == DeclKind::EnumCase && case.name == "Domain"
            });
            if !has_domain_case {
                self.streams.main.push_str(&format!(
                    "static NSString * _Nonnull const {}Domain = @\"{}.{}\";\n",
                    decl.name_for_objc(),
                    graph.module(self.module).name,
                    decl.name
                ));
            }
        }
        Ok(true)
    }

    fn write_struct(&mut self, struct_decl: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        if self.tracker.imports.add_import(struct_decl) || self.tracker.is_defined(struct_decl) {
            return Ok(true);
        }
        let decl = graph.decl(struct_decl);

        self.forward_declare_member_types(&decl.members, struct_decl)?;
        let extensions = self.interop.extensions_for(struct_decl).to_vec();
        for ext in extensions {
            self.forward_declare_member_types(&graph.decl(ext).members, struct_decl)?;
        }
        self.forward_declare_value_type(struct_decl);

        self.tracker.mark_defined(struct_decl);
        self.print(struct_decl);
        Ok(true)
    }

    fn write_func(&mut self, func: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        if self.tracker.imports.add_import(func) {
            return Ok(true);
        }

        if let Some(ty) = graph.decl(func).interface_type.as_ref() {
            let rule = self.walk_rule();
            walk_type(graph, ty, rule, &mut |reference| {
                self.forward_declare_type(reference.decl)
            })?;
        }

        self.tracker.mark_defined(func);
        self.streams.main.push('\n');
        self.print(func);
        Ok(true)
    }

    fn write_decl(&mut self, decl: DeclId) -> EmitResult<bool> {
        let graph = self.graph;
        let d = graph.decl(decl);
        let objc = self.is_objc();
        match d.kind {
            DeclKind::Enum => self.write_enum(decl),
            DeclKind::Class => self.write_class(decl),
            DeclKind::Function => self.write_func(decl),
            DeclKind::Struct if self.options.dialect.value_types_at_top_level => {
                self.write_struct(decl)
            }
            DeclKind::Protocol if objc => self.write_protocol(decl),
            DeclKind::Extension if objc => self.write_extension(decl),
            kind if objc => Err(EmitError::UnexpectedTopLevelDecl {
                name: d.name.clone(),
                kind,
            }),
            kind => {
                debug!(name = %d.name, ?kind, "skipping unsupported top-level declaration");
                Ok(true)
            }
        }
    }

    /// Struct extensions print their members inside the struct itself.
    fn record_value_type_extensions(&mut self, decls: &[DeclId]) {
        for &decl in decls {
            if self.graph.decl(decl).kind != DeclKind::Extension {
                continue;
            }
            if let Some(base) = self.graph.extended_nominal(decl) {
                if self.graph.decl(base).kind == DeclKind::Struct {
                    self.interop.record_extensions(base, decl);
                }
            }
        }
    }

    /// Prints every run of delayed members sharing a container as one batch.
    fn flush_delayed_members(&mut self) {
        let graph = self.graph;
        let delayed: Vec<DeclId> = self.delayed.iter().copied().collect();
        for run in delayed.chunk_by(|a, b| graph.decl(*a).parent == graph.decl(*b).parent) {
            self.printer.print_ad_hoc_category(run, &mut self.streams);
        }
    }

    fn run(&mut self) -> EmitResult<Vec<DeclId>> {
        let graph = self.graph;
        let mut order = collect_top_level(graph, self.module, &self.printer, &self.options.dialect);
        sort_top_level(graph, &mut order)?;
        debug!(
            module = %graph.module(self.module).name,
            count = order.len(),
            "writing top-level declarations"
        );

        self.tracker.work = WorkStack::seeded(&order);
        if self.options.dialect.keep_all_extensions {
            self.record_value_type_extensions(&order);
        }

        while let Some(decl) = self.tracker.work.begin_top() {
            trace!(%decl, name = %graph.decl(decl).name, "writing");
            if !self.write_decl(decl)? {
                continue;
            }
            self.streams.main.push('\n');
            match self.tracker.work.finish_current() {
                Some(done) if done == decl => {}
                _ => {
                    return Err(EmitError::StackCorrupted {
                        name: graph.decl(decl).name.clone(),
                    });
                }
            }
        }

        self.flush_delayed_members();
        Ok(order)
    }

    /// Runs the pass to completion with a fresh interop context.
    pub fn write(self) -> EmitResult<WrittenModule> {
        self.write_with(&mut InteropContext::new())
    }

    /// Runs the pass to completion, sharing `interop` with the other modules
    /// of the same artifact.
    pub fn write_with(mut self, interop: &mut InteropContext) -> EmitResult<WrittenModule> {
        self.interop = std::mem::take(interop);
        let result = self.run();
        *interop = std::mem::take(&mut self.interop);
        let order = result?;

        let (imports, depends_on_stdlib) = self.tracker.imports.into_parts();
        let mut text = self.streams.main;
        text.push_str(&self.streams.out_of_line);
        Ok(WrittenModule {
            text,
            prologue: self.streams.prologue,
            imports,
            depends_on_stdlib,
            order,
            delayed: self.delayed.into_iter().collect(),
        })
    }
}
