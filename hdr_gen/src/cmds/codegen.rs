/* Codegen command - print a module's header */

use super::common::{find_module, format_imports, load_graph};
use anyhow::Context;
use hdr_gen::{
    InteropContext, Language, print_module_contents_cxx, print_module_contents_objc,
    required_access,
};
use hdr_types::AccessLevel;
use std::path::PathBuf;
use tracing::{debug, info};

/* Execute the codegen command */
pub fn run(
    files: Vec<PathBuf>,
    module_name: String,
    language: Language,
    access: Option<AccessLevel>,
    requires_exposed: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    debug!(?language, module = %module_name, files = files.len(), "codegen configuration");

    let graph = load_graph(&files)?;
    let module = find_module(&graph, &module_name)?;

    let header = match language {
        Language::ObjC => {
            let access = access.unwrap_or_else(|| required_access(graph.module(module)));
            let contents = print_module_contents_objc(&graph, module, access)?;
            let imports: Vec<_> = contents.imports.iter().copied().collect();
            format!(
                "{}\n{}",
                format_imports(&graph, &imports, language),
                contents.text
            )
        }
        Language::Cxx => {
            let mut interop = InteropContext::new();
            let contents =
                print_module_contents_cxx(&graph, module, requires_exposed, &mut interop)?;
            if contents.depends_on_standard_library {
                debug!("module depends on the standard library");
            }
            let imports: Vec<_> = contents.imports.iter().copied().collect();
            format!(
                "{}\n{}",
                format_imports(&graph, &imports, language),
                contents.text
            )
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &header)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = header.len(), "wrote header");
        }
        None => print!("{}", header),
    }
    Ok(())
}
