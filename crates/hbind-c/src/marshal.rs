//! Mapping from interface types to C types.
//!
//! Each [`TypeDescriptor`] has exactly one C spelling and one strategy for
//! crossing the boundary. Compound types are erased to a serialized
//! `RustBuffer` under a per-type alias so prototypes stay self-describing.

use hbind_model::{Primitive, TypeDescriptor};

use crate::abi::RUST_BUFFER;
use crate::ctype::CType;
use crate::ident::upper_camel;

/// How a value crosses the C boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStrategy {
    /// Bit-compatible scalar (primitives, enum discriminants).
    Direct,
    /// Record passed by value with C struct layout.
    StructByValue,
    /// Serialized into a `RustBuffer`; ownership moves with the value.
    SerializedBuffer,
    /// Pointer to an object owned by the foreign library.
    OpaquePointer,
}

/// Choose the pass strategy for a type.
pub fn pass_strategy(ty: &TypeDescriptor) -> PassStrategy {
    match ty {
        TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_) => PassStrategy::Direct,
        TypeDescriptor::Record(_) => PassStrategy::StructByValue,
        TypeDescriptor::Buffer
        | TypeDescriptor::Optional(_)
        | TypeDescriptor::Sequence(_)
        | TypeDescriptor::Map(..) => PassStrategy::SerializedBuffer,
        TypeDescriptor::ExternalHandle(_) => PassStrategy::OpaquePointer,
    }
}

/// C type of a primitive.
pub fn primitive_ctype(p: Primitive) -> CType {
    match p {
        Primitive::Bool => CType::Bool,
        Primitive::I8 => CType::Int8,
        Primitive::I16 => CType::Int16,
        Primitive::I32 => CType::Int32,
        Primitive::I64 => CType::Int64,
        Primitive::U8 => CType::UInt8,
        Primitive::U16 => CType::UInt16,
        Primitive::U32 => CType::UInt32,
        Primitive::U64 => CType::UInt64,
        Primitive::F32 => CType::Float,
        Primitive::F64 => CType::Double,
    }
}

/// C type used for a value of `ty` in a field, parameter, or return slot.
///
/// `alias_prefix` is prepended to compound aliases (see [`compound_alias`]).
pub fn ctype_for(ty: &TypeDescriptor, alias_prefix: &str) -> CType {
    match ty {
        TypeDescriptor::Primitive(p) => primitive_ctype(*p),
        TypeDescriptor::Record(name) | TypeDescriptor::Enum(name) => CType::named(name.as_str()),
        TypeDescriptor::Buffer => CType::named(RUST_BUFFER),
        TypeDescriptor::Optional(_) | TypeDescriptor::Sequence(_) | TypeDescriptor::Map(..) => {
            CType::Named(compound_alias(ty, alias_prefix))
        }
        TypeDescriptor::ExternalHandle(name) => CType::pointer(CType::named(name.as_str())),
    }
}

/// Alias name of a compound type, e.g. `GeometrySequenceI32`.
pub fn compound_alias(ty: &TypeDescriptor, alias_prefix: &str) -> String {
    format!("{alias_prefix}{}", mangle(ty))
}

/// Prefix of compound aliases for a namespace.
pub fn alias_prefix(namespace: &str) -> String {
    upper_camel(namespace)
}

fn mangle(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Primitive(p) => upper_camel(p.keyword()),
        TypeDescriptor::Record(name)
        | TypeDescriptor::Enum(name)
        | TypeDescriptor::ExternalHandle(name) => name.clone(),
        TypeDescriptor::Buffer => "Bytes".to_string(),
        TypeDescriptor::Optional(inner) => format!("Optional{}", mangle(inner)),
        TypeDescriptor::Sequence(inner) => format!("Sequence{}", mangle(inner)),
        TypeDescriptor::Map(key, value) => format!("Map{}{}", mangle(key), mangle(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_mapping() {
        assert_eq!(ctype_for(&TypeDescriptor::primitive(Primitive::I32), ""), CType::Int32);
        assert_eq!(ctype_for(&TypeDescriptor::primitive(Primitive::F64), ""), CType::Double);
        assert_eq!(ctype_for(&TypeDescriptor::primitive(Primitive::Bool), ""), CType::Bool);
        assert_eq!(
            ctype_for(&TypeDescriptor::enumeration("Shape"), "").to_string(),
            "Shape"
        );
    }

    #[test]
    fn buffers_and_handles() {
        assert_eq!(ctype_for(&TypeDescriptor::Buffer, "").to_string(), "RustBuffer");
        assert_eq!(
            ctype_for(&TypeDescriptor::handle("Canvas"), "").declare("canvas"),
            "Canvas *canvas"
        );
    }

    #[test]
    fn compound_aliases() {
        let prefix = alias_prefix("geometry");
        assert_eq!(
            compound_alias(&TypeDescriptor::optional(TypeDescriptor::record("Point")), &prefix),
            "GeometryOptionalPoint"
        );
        let int = TypeDescriptor::primitive(Primitive::I32);
        assert_eq!(
            compound_alias(&TypeDescriptor::sequence(int.clone()), &prefix),
            "GeometrySequenceI32"
        );
        assert_eq!(
            compound_alias(&TypeDescriptor::map(TypeDescriptor::Buffer, int), &prefix),
            "GeometryMapBytesI32"
        );
        assert_eq!(
            compound_alias(
                &TypeDescriptor::sequence(TypeDescriptor::optional(TypeDescriptor::Buffer)),
                &prefix
            ),
            "GeometrySequenceOptionalBytes"
        );
    }

    #[test]
    fn strategies() {
        assert_eq!(pass_strategy(&TypeDescriptor::record("Point")), PassStrategy::StructByValue);
        assert_eq!(pass_strategy(&TypeDescriptor::handle("Canvas")), PassStrategy::OpaquePointer);
        assert_eq!(pass_strategy(&TypeDescriptor::Buffer), PassStrategy::SerializedBuffer);
        assert_eq!(
            pass_strategy(&TypeDescriptor::enumeration("Shape")),
            PassStrategy::Direct
        );
    }
}
