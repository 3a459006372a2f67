//! Assembles the emitted module contents into the text of each dialect.

use crate::dialect::{DialectConfig, EmitOptions};
use crate::emission::ModuleWriter;
use crate::errors::EmitResult;
use crate::interop::InteropContext;
use crate::printer::SyntaxPrinter;
use crate::type_mapping::PrimitiveTypeMapping;
use hdr_types::{AccessLevel, ModuleGraph, ModuleId, ModuleInfo};
use indexmap::IndexSet;
use std::collections::BTreeSet;
use tracing::debug;

const STDLIB_OVERLAY_HEADER: &str = "_HdrStdlibCxxOverlay.h";

/// Objective-C contents of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjcModuleOutput {
    pub text: String,
    pub imports: BTreeSet<ModuleId>,
}

/// C++ contents of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CxxModuleOutput {
    pub text: String,
    pub imports: BTreeSet<ModuleId>,
    pub depends_on_standard_library: bool,
    /// The core scaffold was embedded by this call, so the artifact needs the
    /// support headers it relies on.
    pub shared_scaffold_needed: bool,
}

/// Minimum access a declaration needs to be printed for `module`.
pub fn required_access(module: &ModuleInfo) -> AccessLevel {
    if module.externally_consumed {
        AccessLevel::Public
    } else {
        AccessLevel::Internal
    }
}

/// Prints the Objective-C contents of `module`.
pub fn print_module_contents_objc(
    graph: &ModuleGraph,
    module: ModuleId,
    access: AccessLevel,
) -> EmitResult<ObjcModuleOutput> {
    let options = EmitOptions::objc(access);
    let printer = SyntaxPrinter::new(graph, module, options);
    let written = ModuleWriter::new(graph, module, printer, options).write()?;
    let mut text = String::new();
    print_module_scope(&mut text, &options.dialect, &graph.module(module).name, &written.text);
    Ok(ObjcModuleOutput {
        text,
        imports: written.imports,
    })
}

/// Prints the C++ contents of `module` wrapped in its namespace.
///
/// The core scaffold is embedded only the first time `interop` sees it.
pub fn print_module_contents_cxx(
    graph: &ModuleGraph,
    module: ModuleId,
    requires_exposed_attribute: bool,
    interop: &mut InteropContext,
) -> EmitResult<CxxModuleOutput> {
    let options = EmitOptions::cxx(requires_exposed_attribute);
    let printer = SyntaxPrinter::new(graph, module, options);
    let mapping = printer.type_mapping;
    let written = ModuleWriter::new(graph, module, printer, options).write_with(interop)?;

    let info = graph.module(module);
    let mut module_text = written.text;
    if info.is_stdlib() {
        print_include_for_shim_header(&mut module_text, STDLIB_OVERLAY_HEADER);
    }

    let mut text = String::new();
    let shared_scaffold_needed = interop.claim_core_scaffold();
    if shared_scaffold_needed {
        debug!(module = %info.name, "embedding core scaffold");
        text.push_str("#ifndef HDR_PRINTED_CORE\n#define HDR_PRINTED_CORE\n");
        print_core_scaffold(&mapping, &mut text);
        text.push_str("#endif\n");
    }

    if !written.prologue.is_empty() {
        text.push_str("#ifdef __cplusplus\n");
        text.push_str(&format!("namespace {} HDR_PRIVATE_ATTR {{\n", info.name));
        text.push_str("namespace _impl {\n");
        text.push_str("extern \"C\" {\n");
        text.push_str("#endif\n\n");
        text.push_str(&written.prologue);
        text.push_str("\n#ifdef __cplusplus\n");
        text.push_str("}\n}\n}\n");
        text.push_str("#endif\n");
    }

    print_module_scope(&mut text, &options.dialect, &info.name, &module_text);

    Ok(CxxModuleOutput {
        text,
        imports: written.imports,
        depends_on_standard_library: written.depends_on_stdlib,
        shared_scaffold_needed,
    })
}

/* Scope the module's contents under its name when the dialect has namespaces */
fn print_module_scope(out: &mut String, dialect: &DialectConfig, name: &str, body: &str) {
    if !dialect.namespace_module {
        out.push_str(body);
        return;
    }
    out.push_str(&format!("namespace {} HDR_PRIVATE_ATTR {{\n", name));
    out.push_str(body);
    out.push_str(&format!("\n}} // namespace {}\n", name));
}

fn print_include_for_shim_header(out: &mut String, header: &str) {
    out.push_str(&format!("#if __has_include(<hdr/{header}>)\n#include <hdr/{header}>\n"));
    out.push_str(&format!("#elif __has_include(\"{header}\")\n#include \"{header}\"\n#endif\n"));
}

/* Support declarations every C++ header relies on, printed once per artifact */
pub fn print_core_scaffold(mapping: &PrimitiveTypeMapping, out: &mut String) {
    out.push_str("#include <cstddef>\n#include <cstdint>\n");
    out.push_str("namespace hdr HDR_PRIVATE_ATTR {\n");
    out.push_str("template<class T>\nstatic inline const constexpr bool isUsableInGenericContext = false;\n");

    let mut seen = IndexSet::new();
    for primitive in mapping.entries() {
        let Some(size) = primitive.size else {
            continue;
        };
        if !seen.insert(primitive.cxx) {
            continue;
        }
        out.push_str(&format!(
            "static_assert(sizeof({}) == {}, \"{} has unexpected size\");\n",
            primitive.cxx, size, primitive.name
        ));
        out.push_str(&format!(
            "template<>\nstatic inline const constexpr bool isUsableInGenericContext<{}> = true;\n",
            primitive.cxx
        ));
    }
    out.push_str("} // namespace hdr\n");
}
