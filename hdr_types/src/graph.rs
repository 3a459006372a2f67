use crate::decl::{DeclId, DeclKind, Declaration, ModuleId};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    /// A module compiled from source; the subject of header emission.
    #[default]
    Source,
    /// The standard runtime library.
    Stdlib,
    /// The builtin pseudo-module.
    Builtin,
    /// Reserved vector-types module, never imported in C dialects.
    Simd,
    /// A module (or submodule) defined by foreign headers.
    Foreign,
    /// The pseudo-module holding a bridging header's declarations.
    BridgingHeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub name: String,
    pub kind: ModuleKind,
    /// Explicit modules can be imported by name; implicit submodules can't.
    pub explicit: bool,
    pub parent: Option<ModuleId>,
    /// Built for use outside its own package.
    pub externally_consumed: bool,
    pub top_level: Vec<DeclId>,
}

impl ModuleInfo {
    pub fn is_stdlib(&self) -> bool {
        self.kind == ModuleKind::Stdlib
    }
}

/// Arena owning every module and declaration known to one emission.
///
/// Identifiers are indices into the arena and stay valid for the lifetime of
/// the graph. The header generator only reads the graph.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<ModuleInfo>,
    decls: Vec<Declaration>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, name: impl Into<String>, kind: ModuleKind) -> ModuleId {
        let id = ModuleId(self.modules.len());
        self.modules.push(ModuleInfo {
            id,
            name: name.into(),
            kind,
            explicit: true,
            parent: None,
            externally_consumed: false,
            top_level: Vec::new(),
        });
        id
    }

    pub fn module(&self, id: ModuleId) -> &ModuleInfo {
        &self.modules[id.0]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut ModuleInfo {
        &mut self.modules[id.0]
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.iter()
    }

    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        self.modules.iter().find(|m| m.name == name).map(|m| m.id)
    }

    pub fn add_decl(&mut self, kind: DeclKind, name: impl Into<String>, module: ModuleId) -> DeclId {
        let id = DeclId(self.decls.len());
        self.decls.push(Declaration::new(id, kind, name, module));
        id
    }

    /// Adds a declaration and registers it as a top-level declaration of its module.
    pub fn add_top_level(&mut self, kind: DeclKind, name: impl Into<String>, module: ModuleId) -> DeclId {
        let id = self.add_decl(kind, name, module);
        self.modules[module.0].top_level.push(id);
        id
    }

    /// Adds a member declaration to `parent`, in the parent's module.
    pub fn add_member(&mut self, parent: DeclId, kind: DeclKind, name: impl Into<String>) -> DeclId {
        let module = self.decl(parent).module;
        let id = self.add_decl(kind, name, module);
        self.decls[id.0].parent = Some(parent);
        self.decls[parent.0].members.push(id);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.0]
    }

    pub fn decls(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    pub fn top_level_decls(&self, module: ModuleId) -> &[DeclId] {
        &self.module(module).top_level
    }

    pub fn find_top_level(&self, module: ModuleId, name: &str) -> Option<DeclId> {
        self.top_level_decls(module)
            .iter()
            .copied()
            .find(|id| self.decl(*id).name == name)
    }

    /// Nominal type an extension extends.
    pub fn extended_nominal(&self, ext: DeclId) -> Option<DeclId> {
        self.decl(ext).extended
    }

    /// Class an extension extends, if the extended type is a class.
    pub fn self_class_decl(&self, ext: DeclId) -> Option<DeclId> {
        self.extended_nominal(ext)
            .filter(|id| self.decl(*id).kind == DeclKind::Class)
    }

    pub fn module_of(&self, decl: DeclId) -> &ModuleInfo {
        self.module(self.decl(decl).module)
    }

    /// Nearest explicit module at or above `module`.
    pub fn nearest_explicit(&self, module: ModuleId) -> Option<ModuleId> {
        let mut current = Some(module);
        while let Some(id) = current {
            let info = self.module(id);
            if info.explicit {
                return Some(id);
            }
            current = info.parent;
        }
        None
    }
}
