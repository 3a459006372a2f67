/* Common utilities shared between analyze and codegen commands */

use anyhow::Context;
use hdr_gen::Language;
use hdr_loader::ModuleLoader;
use hdr_types::{DeclId, ModuleGraph, ModuleId};
use std::path::PathBuf;
use tracing::info;

/* Load every module file and link them into one graph */
pub fn load_graph(files: &[PathBuf]) -> anyhow::Result<ModuleGraph> {
    let mut loader = ModuleLoader::new();
    for file in files {
        loader
            .load_file(file)
            .with_context(|| format!("failed to load {}", file.display()))?;
    }
    let graph = loader.build()?;
    info!(
        files = files.len(),
        modules = loader.module_names().count(),
        "loaded module descriptions"
    );
    Ok(graph)
}

pub fn find_module(graph: &ModuleGraph, name: &str) -> anyhow::Result<ModuleId> {
    graph.find_module(name).with_context(|| {
        let known = graph
            .modules()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("module '{}' not found (loaded: {})", name, known)
    })
}

/* Human-readable name of a declaration, qualified by its container */
pub fn display_name(graph: &ModuleGraph, decl: DeclId) -> String {
    let d = graph.decl(decl);
    match d.parent {
        Some(parent) => format!("{}.{}", graph.decl(parent).name, d.name),
        None if d.name.is_empty() => match graph.extended_nominal(decl) {
            Some(base) => format!("extension {}", graph.decl(base).name),
            None => "extension".to_string(),
        },
        None => d.name.clone(),
    }
}

/* Import lines for the header preamble */
pub fn format_imports(graph: &ModuleGraph, imports: &[ModuleId], language: Language) -> String {
    let mut out = String::new();
    for module in imports {
        let name = &graph.module(*module).name;
        match language {
            Language::ObjC => out.push_str(&format!("@import {};\n", name)),
            Language::Cxx => out.push_str(&format!("#include <{}/{}.h>\n", name, name)),
        }
    }
    out
}
