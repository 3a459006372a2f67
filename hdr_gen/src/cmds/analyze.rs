/* Analyze command - report emission order, imports and delayed members */

use super::common::{display_name, find_module, load_graph};
use hdr_gen::{EmitOptions, Language, ModuleWriter, SyntaxPrinter, required_access};
use serde_derive::Serialize;
use std::path::PathBuf;

#[derive(Serialize, Debug)]
pub struct AnalysisReport {
    pub module: String,
    pub language: String,
    pub order: Vec<String>,
    pub imports: Vec<String>,
    pub delayed_members: Vec<String>,
    pub depends_on_stdlib: bool,
}

/* Execute the analyze command */
pub fn run(
    files: Vec<PathBuf>,
    module_name: String,
    language: Language,
    json: bool,
) -> anyhow::Result<()> {
    let graph = load_graph(&files)?;
    let module = find_module(&graph, &module_name)?;

    let options = match language {
        Language::ObjC => EmitOptions::objc(required_access(graph.module(module))),
        Language::Cxx => EmitOptions::cxx(false),
    };
    let printer = SyntaxPrinter::new(&graph, module, options);
    let written = ModuleWriter::new(&graph, module, printer, options).write()?;

    let report = AnalysisReport {
        module: module_name,
        language: format!("{:?}", language),
        order: written
            .order
            .iter()
            .map(|decl| display_name(&graph, *decl))
            .collect(),
        imports: written
            .imports
            .iter()
            .map(|m| graph.module(*m).name.clone())
            .collect(),
        delayed_members: written
            .delayed
            .iter()
            .map(|decl| display_name(&graph, *decl))
            .collect(),
        depends_on_stdlib: written.depends_on_stdlib,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Header Generator - Emission Analysis");
    println!("====================================\n");
    println!("[~] Module: {} ({})", report.module, report.language);
    println!("[~] Top-level order:");
    for (index, name) in report.order.iter().enumerate() {
        println!("    {:>3}. {}", index + 1, name);
    }
    println!("[~] Imports:");
    if report.imports.is_empty() {
        println!("    (none)");
    }
    for name in &report.imports {
        println!("    - {}", name);
    }
    if !report.delayed_members.is_empty() {
        println!("[~] Members delayed into ad hoc batches:");
        for name in &report.delayed_members {
            println!("    - {}", name);
        }
    }
    if report.depends_on_stdlib {
        println!("[~] Depends on the standard library");
    }
    Ok(())
}
