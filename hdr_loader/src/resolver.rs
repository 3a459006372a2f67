use crate::file::load_module_file;
use hdr_types::{
    DeclAttrs, DeclId, DeclKind, DeclSpec, ForeignOrigin, GenericParam, ModuleFile, ModuleGraph,
    ModuleId, TypeExpr, TypeSpec,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/* Declaration allocated in the graph whose references are not linked yet */
struct PendingDecl<'a> {
    id: DeclId,
    spec: &'a DeclSpec,
    module_name: &'a str,
    /* Enclosing declarations including the declaration itself, innermost last */
    scope: Vec<DeclId>,
}

/* Name tables built while allocating declarations */
#[derive(Default)]
struct NameTables {
    /* Qualified path ("Module.Outer.Inner") -> declaration */
    paths: HashMap<String, DeclId>,
    /* Declaration -> its qualified path */
    decl_paths: HashMap<DeclId, String>,
    /* Owner declaration -> generic parameter declarations in order */
    generic_params: HashMap<DeclId, Vec<(String, DeclId)>>,
}

/* Loader for module description files; links them into one module graph */
pub struct ModuleLoader {
    /* Track loaded files to skip duplicates */
    loaded_files: HashSet<PathBuf>,

    /* All loaded module descriptions, in load order */
    files: Vec<ModuleFile>,
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader {
    pub fn new() -> Self {
        Self {
            loaded_files: HashSet::new(),
            files: Vec::new(),
        }
    }

    /* Load a module description from disk */
    pub fn load_file(&mut self, file_path: &Path) -> anyhow::Result<()> {
        let canonical_path = file_path.canonicalize()?;
        if !self.loaded_files.insert(canonical_path) {
            debug!(path = %file_path.display(), "skipping already loaded module description");
            return Ok(());
        }

        let file = load_module_file(file_path)?;
        debug!(
            module = %file.module,
            declarations = file.declarations.len(),
            "loaded module description"
        );
        self.add_module_file(file)
    }

    /* Register an already parsed module description */
    pub fn add_module_file(&mut self, file: ModuleFile) -> anyhow::Result<()> {
        if self.files.iter().any(|f| f.module == file.module) {
            anyhow::bail!("Module '{}' is described more than once", file.module);
        }
        self.files.push(file);
        Ok(())
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.module.as_str())
    }

    /* Build the module graph, resolving every name-based reference */
    pub fn build(&self) -> anyhow::Result<ModuleGraph> {
        let mut graph = ModuleGraph::new();

        for file in &self.files {
            let id = graph.add_module(&file.module, file.kind);
            let info = graph.module_mut(id);
            info.explicit = file.explicit;
            info.externally_consumed = file.externally_consumed;
        }

        for file in &self.files {
            if let Some(parent) = &file.parent {
                let parent_id = graph.find_module(parent).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Module '{}' names unknown parent module '{}'",
                        file.module,
                        parent
                    )
                })?;
                let id = module_id(&graph, &file.module)?;
                graph.module_mut(id).parent = Some(parent_id);
            }
        }

        /* First pass: allocate every declaration so references can point forward */
        let mut tables = NameTables::default();
        let mut pending = Vec::new();
        for file in &self.files {
            let module = module_id(&graph, &file.module)?;
            for spec in &file.declarations {
                allocate(
                    &mut graph,
                    &mut tables,
                    &mut pending,
                    spec,
                    module,
                    &file.module,
                    &file.module,
                    None,
                    Vec::new(),
                )?;
            }
        }

        /* Second pass: link references */
        for item in &pending {
            link(&mut graph, &tables, item)?;
        }

        debug!(
            modules = self.files.len(),
            declarations = graph.decls().count(),
            "built module graph"
        );
        Ok(graph)
    }
}

fn module_id(graph: &ModuleGraph, name: &str) -> anyhow::Result<ModuleId> {
    graph
        .find_module(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown module '{}'", name))
}

#[allow(clippy::too_many_arguments)]
fn allocate<'a>(
    graph: &mut ModuleGraph,
    tables: &mut NameTables,
    pending: &mut Vec<PendingDecl<'a>>,
    spec: &'a DeclSpec,
    module: ModuleId,
    module_name: &'a str,
    prefix: &str,
    parent: Option<DeclId>,
    scope: Vec<DeclId>,
) -> anyhow::Result<()> {
    if spec.kind != DeclKind::Extension && spec.name.is_empty() {
        anyhow::bail!(
            "{:?} declaration in module '{}' has no name",
            spec.kind,
            module_name
        );
    }

    let id = match parent {
        None => graph.add_top_level(spec.kind, &spec.name, module),
        Some(parent) => graph.add_member(parent, spec.kind, &spec.name),
    };
    {
        let decl = graph.decl_mut(id);
        decl.access = spec.access;
        decl.attrs = DeclAttrs {
            objc: spec.objc || spec.explicit_objc,
            explicit_objc: spec.explicit_objc,
            exposed: spec.exposed,
            compatibility_alias: spec.compatibility_alias,
            error_type: spec.error_type,
            objc_name: spec.objc_name.clone(),
        };
    }

    /* Extensions are anonymous; their members stay addressable under the module */
    let child_prefix = if spec.kind == DeclKind::Extension {
        prefix.to_string()
    } else {
        let path = format!("{}.{}", prefix, spec.name);
        tables.paths.entry(path.clone()).or_insert(id);
        tables.decl_paths.insert(id, path.clone());
        path
    };

    for param in &spec.generic_params {
        let param_id = graph.add_decl(DeclKind::GenericParam, &param.name, module);
        graph.decl_mut(param_id).parent = Some(id);
        tables
            .generic_params
            .entry(id)
            .or_default()
            .push((param.name.clone(), param_id));
    }

    let mut inner_scope = scope;
    inner_scope.push(id);
    pending.push(PendingDecl {
        id,
        spec,
        module_name,
        scope: inner_scope.clone(),
    });

    for member in &spec.members {
        allocate(
            graph,
            tables,
            pending,
            member,
            module,
            module_name,
            &child_prefix,
            Some(id),
            inner_scope.clone(),
        )?;
    }

    Ok(())
}

fn link(graph: &mut ModuleGraph, tables: &NameTables, item: &PendingDecl<'_>) -> anyhow::Result<()> {
    let spec = item.spec;
    let resolve = |name: &str| resolve_decl(tables, name, item.module_name, &item.scope);

    let superclass = spec.superclass.as_deref().map(resolve).transpose()?;
    let protocols = spec
        .protocols
        .iter()
        .map(|name| resolve(name))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let extended = spec.extends.as_deref().map(resolve).transpose()?;
    if spec.kind == DeclKind::Extension && extended.is_none() {
        anyhow::bail!(
            "Extension in module '{}' does not name the type it extends",
            item.module_name
        );
    }

    let foreign = match &spec.foreign {
        Some(foreign) => Some(ForeignOrigin {
            owning_module: foreign
                .module
                .as_deref()
                .map(|name| module_id(graph, name))
                .transpose()?,
            class_kind: foreign.class_kind,
        }),
        None => None,
    };

    let declared_params = tables
        .generic_params
        .get(&item.id)
        .cloned()
        .unwrap_or_default();
    let mut generic_params = Vec::with_capacity(declared_params.len());
    for (param_spec, (_, param_id)) in spec.generic_params.iter().zip(declared_params) {
        generic_params.push(GenericParam {
            decl: param_id,
            name: param_spec.name.clone(),
            class_bound: param_spec.class_bound,
            superclass_bound: param_spec.superclass.as_deref().map(resolve).transpose()?,
            protocols: param_spec
                .protocols
                .iter()
                .map(|name| resolve(name))
                .collect::<anyhow::Result<Vec<_>>>()?,
        });
    }

    let interface_type = spec
        .ty
        .as_ref()
        .map(|ty| resolve_type(graph, tables, ty, item))
        .transpose()?;
    let raw_type = spec
        .raw_type
        .as_ref()
        .map(|ty| resolve_type(graph, tables, ty, item))
        .transpose()?;

    let decl = graph.decl_mut(item.id);
    decl.superclass = superclass;
    decl.protocols = protocols;
    decl.extended = extended;
    decl.foreign = foreign;
    decl.generic_params = generic_params;
    decl.interface_type = interface_type;
    decl.raw_type = raw_type;
    Ok(())
}

/* Resolve a declaration name: enclosing scopes first, then the module, then fully qualified */
fn resolve_decl(
    tables: &NameTables,
    name: &str,
    module_name: &str,
    scope: &[DeclId],
) -> anyhow::Result<DeclId> {
    for enclosing in scope.iter().rev() {
        if let Some(path) = tables.decl_paths.get(enclosing) {
            if let Some(id) = tables.paths.get(&format!("{}.{}", path, name)) {
                return Ok(*id);
            }
        }
    }
    if let Some(id) = tables.paths.get(&format!("{}.{}", module_name, name)) {
        return Ok(*id);
    }
    if let Some(id) = tables.paths.get(name) {
        return Ok(*id);
    }
    anyhow::bail!(
        "Unknown declaration '{}' referenced from module '{}'",
        name,
        module_name
    )
}

fn resolve_type(
    graph: &ModuleGraph,
    tables: &NameTables,
    spec: &TypeSpec,
    item: &PendingDecl<'_>,
) -> anyhow::Result<TypeExpr> {
    let resolve = |name: &str| resolve_decl(tables, name, item.module_name, &item.scope);
    let ty = match spec {
        TypeSpec::Builtin(name) => TypeExpr::Builtin(name.clone()),
        TypeSpec::Nominal(name) | TypeSpec::Alias(name) => {
            let id = resolve(name)?;
            if graph.decl(id).kind == DeclKind::TypeAlias {
                TypeExpr::Alias(id)
            } else {
                TypeExpr::Nominal(id)
            }
        }
        TypeSpec::Generic { decl, args } => TypeExpr::BoundGeneric {
            decl: resolve(decl)?,
            args: args
                .iter()
                .map(|arg| resolve_type(graph, tables, arg, item))
                .collect::<anyhow::Result<Vec<_>>>()?,
        },
        TypeSpec::Optional(inner) => {
            TypeExpr::Optional(Box::new(resolve_type(graph, tables, inner, item)?))
        }
        TypeSpec::Tuple(elems) => TypeExpr::Tuple(
            elems
                .iter()
                .map(|elem| resolve_type(graph, tables, elem, item))
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
        TypeSpec::Function { params, result } => TypeExpr::Function {
            params: params
                .iter()
                .map(|param| resolve_type(graph, tables, param, item))
                .collect::<anyhow::Result<Vec<_>>>()?,
            result: Box::new(resolve_type(graph, tables, result, item)?),
        },
        TypeSpec::Param(name) => TypeExpr::GenericParam(resolve_param(tables, name, item)?),
    };
    Ok(ty)
}

fn resolve_param(tables: &NameTables, name: &str, item: &PendingDecl<'_>) -> anyhow::Result<DeclId> {
    for enclosing in item.scope.iter().rev() {
        if let Some(params) = tables.generic_params.get(enclosing) {
            if let Some((_, id)) = params.iter().find(|(param, _)| param == name) {
                return Ok(*id);
            }
        }
    }
    anyhow::bail!(
        "Generic parameter '{}' is not in scope in module '{}'",
        name,
        item.module_name
    )
}
