use crate::decl::{AccessLevel, DeclKind, ForeignClassKind};
use crate::graph::ModuleKind;
use serde_derive::{Deserialize, Serialize};

/* ============================================================================
   Module description files

   One YAML file describes one module. Declarations reference each other by
   name: either relative to the declaring module ("Dog", "Outer.Inner") or
   qualified with a module name ("Foundation.NSObject").
   ============================================================================ */

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleFile {
    pub module: String,
    #[serde(default)]
    pub kind: ModuleKind,
    #[serde(default = "default_true")]
    pub explicit: bool,
    /* Parent module name for submodules */
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub externally_consumed: bool,
    #[serde(default)]
    pub declarations: Vec<DeclSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DeclSpec {
    /* Extensions are anonymous */
    #[serde(default)]
    pub name: String,
    pub kind: DeclKind,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default)]
    pub members: Vec<DeclSpec>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub generic_params: Vec<GenericParamSpec>,
    #[serde(default)]
    pub foreign: Option<ForeignSpec>,
    #[serde(
        default,
        rename = "type",
        with = "serde_yml::with::singleton_map_recursive"
    )]
    pub ty: Option<TypeSpec>,
    #[serde(default, with = "serde_yml::with::singleton_map_recursive")]
    pub raw_type: Option<TypeSpec>,
    #[serde(default)]
    pub objc: bool,
    #[serde(default)]
    pub explicit_objc: bool,
    #[serde(default)]
    pub exposed: bool,
    #[serde(default)]
    pub compatibility_alias: bool,
    #[serde(default)]
    pub error_type: bool,
    #[serde(default)]
    pub objc_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct GenericParamSpec {
    pub name: String,
    #[serde(default)]
    pub class_bound: bool,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ForeignSpec {
    /* Owning foreign (sub)module */
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub class_kind: ForeignClassKind,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum TypeSpec {
    Builtin(String),
    Nominal(String),
    Alias(String),
    Generic { decl: String, args: Vec<TypeSpec> },
    Optional(Box<TypeSpec>),
    Tuple(Vec<TypeSpec>),
    Function { params: Vec<TypeSpec>, result: Box<TypeSpec> },
    Param(String),
}
