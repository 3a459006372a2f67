use crate::dialect::Language;

/* One builtin type and its spelling in each dialect */
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveSpelling {
    pub name: &'static str,
    pub objc: &'static str,
    pub cxx: &'static str,
    /* Size in bytes when fixed, checked by the core scaffold */
    pub size: Option<u8>,
}

const PRIMITIVES: &[PrimitiveSpelling] = &[
    PrimitiveSpelling { name: "Bool", objc: "BOOL", cxx: "bool", size: Some(1) },
    PrimitiveSpelling { name: "Int", objc: "NSInteger", cxx: "ptrdiff_t", size: None },
    PrimitiveSpelling { name: "UInt", objc: "NSUInteger", cxx: "size_t", size: None },
    PrimitiveSpelling { name: "Int8", objc: "int8_t", cxx: "int8_t", size: Some(1) },
    PrimitiveSpelling { name: "Int16", objc: "int16_t", cxx: "int16_t", size: Some(2) },
    PrimitiveSpelling { name: "Int32", objc: "int32_t", cxx: "int32_t", size: Some(4) },
    PrimitiveSpelling { name: "Int64", objc: "int64_t", cxx: "int64_t", size: Some(8) },
    PrimitiveSpelling { name: "UInt8", objc: "uint8_t", cxx: "uint8_t", size: Some(1) },
    PrimitiveSpelling { name: "UInt16", objc: "uint16_t", cxx: "uint16_t", size: Some(2) },
    PrimitiveSpelling { name: "UInt32", objc: "uint32_t", cxx: "uint32_t", size: Some(4) },
    PrimitiveSpelling { name: "UInt64", objc: "uint64_t", cxx: "uint64_t", size: Some(8) },
    PrimitiveSpelling { name: "Float", objc: "float", cxx: "float", size: Some(4) },
    PrimitiveSpelling { name: "Double", objc: "double", cxx: "double", size: Some(8) },
    PrimitiveSpelling { name: "Float32", objc: "float", cxx: "float", size: Some(4) },
    PrimitiveSpelling { name: "Float64", objc: "double", cxx: "double", size: Some(8) },
    PrimitiveSpelling { name: "OpaquePointer", objc: "void *", cxx: "void *", size: None },
    PrimitiveSpelling { name: "UnsafeRawPointer", objc: "void const *", cxx: "void const *", size: None },
    PrimitiveSpelling { name: "UnsafeMutableRawPointer", objc: "void *", cxx: "void *", size: None },
    PrimitiveSpelling { name: "String", objc: "NSString *", cxx: "hdr::String", size: None },
    PrimitiveSpelling { name: "Void", objc: "void", cxx: "void", size: None },
];

/* Table mapping builtin type names to their dialect spellings */
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveTypeMapping;

impl PrimitiveTypeMapping {
    pub fn new() -> Self {
        Self
    }

    pub fn lookup(&self, name: &str, language: Language) -> Option<&'static str> {
        PRIMITIVES.iter().find(|p| p.name == name).map(|p| match language {
            Language::ObjC => p.objc,
            Language::Cxx => p.cxx,
        })
    }

    /* Spelling for a builtin, falling back to the builtin's own name */
    pub fn spelling<'a>(&self, name: &'a str, language: Language) -> &'a str {
        self.lookup(name, language).unwrap_or(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &'static PrimitiveSpelling> {
        PRIMITIVES.iter()
    }
}
