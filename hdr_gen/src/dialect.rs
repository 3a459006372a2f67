use hdr_types::AccessLevel;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Language {
    /// Objective-C style headers (dialect A).
    ObjC,
    /// C++ style headers (dialect B).
    Cxx,
}

/// The independent axes on which the two output dialects differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectConfig {
    pub language: Language,
    /// Local value types are forward declared as `class Name;`.
    pub value_type_forward_decls: bool,
    /// A value type used by value needs its full definition first.
    pub by_value_needs_definition: bool,
    /// Module contents are scoped under a namespace named after the module.
    pub namespace_module: bool,
    /// Structs may be exported at top level and act as member containers.
    pub value_types_at_top_level: bool,
    /// A class's local protocol conformances must be defined before it.
    pub conformances_are_prerequisites: bool,
    /// Referenced types are bridged to their counterparts before resolution.
    pub bridge_types: bool,
    /// Every extension is a top-level candidate, not only class extensions.
    pub keep_all_extensions: bool,
    /// Nested types must be explicitly marked to be emitted after their container.
    pub nested_types_need_explicit_attr: bool,
}

impl DialectConfig {
    pub fn objc() -> Self {
        Self {
            language: Language::ObjC,
            value_type_forward_decls: false,
            by_value_needs_definition: false,
            namespace_module: false,
            value_types_at_top_level: false,
            conformances_are_prerequisites: true,
            bridge_types: true,
            keep_all_extensions: false,
            nested_types_need_explicit_attr: true,
        }
    }

    pub fn cxx() -> Self {
        Self {
            language: Language::Cxx,
            value_type_forward_decls: true,
            by_value_needs_definition: true,
            namespace_module: true,
            value_types_at_top_level: true,
            conformances_are_prerequisites: false,
            bridge_types: false,
            keep_all_extensions: true,
            nested_types_need_explicit_attr: false,
        }
    }

    pub fn is_cxx(&self) -> bool {
        self.language == Language::Cxx
    }
}

/// Knobs for one emission pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Minimum access level a declaration needs to be printed.
    pub access: AccessLevel,
    pub dialect: DialectConfig,
    /// C++ only: declarations must opt in with an explicit expose attribute.
    pub requires_exposed_attribute: bool,
}

impl EmitOptions {
    pub fn objc(access: AccessLevel) -> Self {
        Self {
            access,
            dialect: DialectConfig::objc(),
            requires_exposed_attribute: false,
        }
    }

    pub fn cxx(requires_exposed_attribute: bool) -> Self {
        Self {
            access: AccessLevel::Public,
            dialect: DialectConfig::cxx(),
            requires_exposed_attribute,
        }
    }
}
