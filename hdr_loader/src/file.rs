use hdr_types::ModuleFile;
use std::path::Path;

/* Parse a module description from YAML text */
pub fn parse_module_file(contents: &str) -> anyhow::Result<ModuleFile> {
    let file: ModuleFile = serde_yml::from_str(contents)?;
    if file.module.is_empty() {
        anyhow::bail!("Module description is missing a module name");
    }
    Ok(file)
}

/* Read and parse a module description file */
pub fn load_module_file(path: &Path) -> anyhow::Result<ModuleFile> {
    let file = std::fs::File::open(path)?;
    let contents = std::io::read_to_string(file)?;
    parse_module_file(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse '{}': {}", path.display(), e))
}
