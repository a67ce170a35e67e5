//! Type descriptors: the language-neutral type universe of an interface.
//!
//! A [`TypeDescriptor`] names a type as it appears in a signature or field.
//! Records, enums, and handles are referenced by name; their definitions live
//! in the [`InterfaceModel`](crate::model::InterfaceModel).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed-size scalar types that map directly onto a C primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl Primitive {
    /// Every primitive, in declaration order.
    pub const ALL: [Primitive; 11] = [
        Primitive::Bool,
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
    ];

    /// The keyword used for this primitive in type expressions.
    pub fn keyword(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }

    /// Look up a primitive by its type-expression keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.keyword() == s)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a type used by a field, parameter, or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "kebab-case")]
pub enum TypeDescriptor {
    /// Scalar with a direct C equivalent.
    Primitive(Primitive),
    /// A record, by name.
    Record(String),
    /// An enumeration, by name.
    Enum(String),
    /// A byte buffer (strings and raw bytes).
    Buffer,
    /// A nullable value, serialized into a buffer.
    Optional(Box<TypeDescriptor>),
    /// A variable-length list, serialized into a buffer.
    Sequence(Box<TypeDescriptor>),
    /// A key/value map, serialized into a buffer.
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// An opaque object owned by the foreign library, by name.
    ExternalHandle(String),
}

impl TypeDescriptor {
    pub fn primitive(p: Primitive) -> Self {
        TypeDescriptor::Primitive(p)
    }

    pub fn record(name: impl Into<String>) -> Self {
        TypeDescriptor::Record(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        TypeDescriptor::Enum(name.into())
    }

    pub fn handle(name: impl Into<String>) -> Self {
        TypeDescriptor::ExternalHandle(name.into())
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    pub fn sequence(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(inner))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(key), Box::new(value))
    }

    /// Whether this type is erased to a serialized buffer at the C boundary.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Optional(_) | TypeDescriptor::Sequence(_) | TypeDescriptor::Map(..)
        )
    }

    /// The name of the declared type this descriptor refers to, if any.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Record(name)
            | TypeDescriptor::Enum(name)
            | TypeDescriptor::ExternalHandle(name) => Some(name),
            _ => None,
        }
    }

    /// Visit this descriptor and every descriptor nested inside it, outermost first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeDescriptor)) {
        visit(self);
        match self {
            TypeDescriptor::Optional(inner) | TypeDescriptor::Sequence(inner) => inner.walk(visit),
            TypeDescriptor::Map(key, value) => {
                key.walk(visit);
                value.walk(visit);
            }
            _ => {}
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => write!(f, "{p}"),
            TypeDescriptor::Record(name)
            | TypeDescriptor::Enum(name)
            | TypeDescriptor::ExternalHandle(name) => write!(f, "{name}"),
            TypeDescriptor::Buffer => write!(f, "bytes"),
            TypeDescriptor::Optional(inner) => write!(f, "optional<{inner}>"),
            TypeDescriptor::Sequence(inner) => write!(f, "sequence<{inner}>"),
            TypeDescriptor::Map(key, value) => write!(f, "map<{key}, {value}>"),
        }
    }
}
