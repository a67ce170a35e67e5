//! C type representation used when printing declarations.

/// A C type as it appears in a generated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CType {
    Void,
    Bool,
    Float,
    Double,
    // stdint types
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    /// Pointer to another type.
    Pointer(Box<CType>),
    /// Const-qualified type.
    Const(Box<CType>),
    /// A typedef name (records, enums, handles, buffer aliases).
    Named(String),
}

impl CType {
    pub fn pointer(inner: CType) -> Self {
        CType::Pointer(Box::new(inner))
    }

    pub fn constant(inner: CType) -> Self {
        CType::Const(Box::new(inner))
    }

    pub fn named(name: impl Into<String>) -> Self {
        CType::Named(name.into())
    }

    /// Print a declarator: `int32_t x`, `uint8_t *data`.
    pub fn declare(&self, name: &str) -> String {
        let ty = self.to_string();
        if ty.ends_with('*') {
            format!("{ty}{name}")
        } else {
            format!("{ty} {name}")
        }
    }
}

impl std::fmt::Display for CType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::Bool => write!(f, "bool"),
            CType::Float => write!(f, "float"),
            CType::Double => write!(f, "double"),
            CType::Int8 => write!(f, "int8_t"),
            CType::Int16 => write!(f, "int16_t"),
            CType::Int32 => write!(f, "int32_t"),
            CType::Int64 => write!(f, "int64_t"),
            CType::UInt8 => write!(f, "uint8_t"),
            CType::UInt16 => write!(f, "uint16_t"),
            CType::UInt32 => write!(f, "uint32_t"),
            CType::UInt64 => write!(f, "uint64_t"),
            CType::Pointer(inner) => {
                if matches!(inner.as_ref(), CType::Pointer(_)) {
                    write!(f, "{inner}*")
                } else {
                    write!(f, "{inner} *")
                }
            }
            CType::Const(inner) => write!(f, "const {inner}"),
            CType::Named(name) => write!(f, "{name}"),
        }
    }
}
