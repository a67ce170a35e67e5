//! The interface model: exported records, enums, handles, and functions.
//!
//! Items are kept in declaration order. Declaration order is significant:
//! record fields define struct layout and enum variants define discriminants.

use serde::{Deserialize, Serialize};

use crate::convention::ErrorConvention;
use crate::error::{ModelError, Result};
use crate::hash::{checksum16, content_hash, hash_hex};
use crate::types::TypeDescriptor;

/// Metadata about the foreign library the interface describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryInfo {
    /// Namespace of the interface (e.g., "geometry"). Used for guards and file names.
    pub namespace: String,
    /// Prefix prepended to every exported symbol.
    #[serde(default)]
    pub symbol_prefix: String,
    /// Functions the caller must invoke, in order, before any other call.
    #[serde(default)]
    pub initializers: Vec<String>,
    /// Free-form documentation.
    #[serde(default)]
    pub docs: Option<String>,
}

/// A single record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub docs: Option<String>,
}

/// A record (C struct) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    pub name: String,
    /// Fields in layout order.
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub docs: Option<String>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            docs: None,
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            docs: None,
        });
        self
    }

    #[must_use]
    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// A single enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    #[serde(default)]
    pub docs: Option<String>,
}

/// A field-less enumeration. Discriminants follow declaration order from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<VariantDef>,
    #[serde(default)]
    pub docs: Option<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            docs: None,
        }
    }

    /// Append a variant.
    #[must_use]
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(VariantDef {
            name: name.into(),
            docs: None,
        });
        self
    }

    #[must_use]
    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    /// Variants paired with their discriminant.
    pub fn discriminants(&self) -> impl Iterator<Item = (u32, &VariantDef)> {
        (0u32..).zip(self.variants.iter())
    }
}

/// An opaque object owned by the foreign library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleDef {
    pub name: String,
    #[serde(default)]
    pub docs: Option<String>,
}

impl HandleDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: None,
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// An exported foreign function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Param>,
    /// Return type; `None` for functions returning nothing.
    #[serde(default)]
    pub returns: Option<TypeDescriptor>,
    #[serde(default)]
    pub error: ErrorConvention,
    #[serde(default)]
    pub docs: Option<String>,
}

/// The parts of a signature that determine its C prototype.
#[derive(Serialize)]
struct SignatureShape<'a> {
    name: &'a str,
    params: Vec<&'a TypeDescriptor>,
    returns: Option<&'a TypeDescriptor>,
    error: ErrorConvention,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            error: ErrorConvention::default(),
            docs: None,
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: TypeDescriptor) -> Self {
        self.returns = Some(ty);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: ErrorConvention) -> Self {
        self.error = error;
        self
    }

    #[must_use]
    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    fn shape(&self) -> SignatureShape<'_> {
        SignatureShape {
            name: &self.name,
            params: self.params.iter().map(|p| &p.ty).collect(),
            returns: self.returns.as_ref(),
            error: self.error,
        }
    }

    /// Whether two declarations produce the same C prototype.
    ///
    /// Parameter names and docs do not take part: C accepts redeclarations
    /// that differ only in parameter names.
    pub fn same_shape(&self, other: &FunctionSignature) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty)
            && self.returns == other.returns
            && self.error == other.error
    }

    /// 16-bit checksum of the signature shape, compared at load time.
    pub fn checksum(&self) -> u16 {
        checksum16(&self.shape())
    }

    /// Every type descriptor the signature mentions, parameters first.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.params.iter().map(|p| &p.ty).chain(self.returns.as_ref())
    }
}

/// Kind of a named type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    Record,
    Enum,
    Handle,
}

impl std::fmt::Display for NamedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamedKind::Record => write!(f, "record"),
            NamedKind::Enum => write!(f, "enum"),
            NamedKind::Handle => write!(f, "handle"),
        }
    }
}

/// A complete interface: the single input of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceModel {
    pub library: LibraryInfo,
    #[serde(default)]
    pub records: Vec<RecordDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    #[serde(default)]
    pub handles: Vec<HandleDef>,
    /// Functions in declaration order. Duplicate names are permitted here and
    /// reconciled by the generator.
    #[serde(default)]
    pub functions: Vec<FunctionSignature>,
}

impl InterfaceModel {
    /// Create an empty interface for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            library: LibraryInfo {
                namespace: namespace.into(),
                symbol_prefix: String::new(),
                initializers: Vec::new(),
                docs: None,
            },
            records: Vec::new(),
            enums: Vec::new(),
            handles: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Set the prefix prepended to every exported symbol.
    #[must_use]
    pub fn with_symbol_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.library.symbol_prefix = prefix.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.library.namespace
    }

    /// Add a record, rejecting duplicate type names and duplicate fields.
    pub fn add_record(&mut self, record: RecordDef) -> Result<()> {
        self.ensure_new_type(&record.name)?;
        ensure_unique(&record.name, record.fields.iter().map(|f| f.name.as_str()))?;
        self.records.push(record);
        Ok(())
    }

    /// Add an enum, rejecting duplicates and enums without variants.
    pub fn add_enum(&mut self, def: EnumDef) -> Result<()> {
        self.ensure_new_type(&def.name)?;
        if def.variants.is_empty() {
            return Err(ModelError::EmptyEnum { name: def.name });
        }
        ensure_unique(&def.name, def.variants.iter().map(|v| v.name.as_str()))?;
        self.enums.push(def);
        Ok(())
    }

    /// Add an external handle type.
    pub fn add_handle(&mut self, handle: HandleDef) -> Result<()> {
        self.ensure_new_type(&handle.name)?;
        self.handles.push(handle);
        Ok(())
    }

    /// Add a function. Name clashes are checked at generation time.
    pub fn add_function(&mut self, function: FunctionSignature) {
        self.functions.push(function);
    }

    /// Look up the kind of a named type.
    pub fn kind_of(&self, name: &str) -> Option<NamedKind> {
        if self.record(name).is_some() {
            Some(NamedKind::Record)
        } else if self.enum_def(name).is_some() {
            Some(NamedKind::Enum)
        } else if self.handle(name).is_some() {
            Some(NamedKind::Handle)
        } else {
            None
        }
    }

    pub fn record(&self, name: &str) -> Option<&RecordDef> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn handle(&self, name: &str) -> Option<&HandleDef> {
        self.handles.iter().find(|h| h.name == name)
    }

    /// Whether a descriptor points at a definition of the matching kind.
    ///
    /// Primitives and buffers always resolve; compound types resolve when
    /// every nested descriptor does.
    pub fn resolves(&self, ty: &TypeDescriptor) -> bool {
        let mut ok = true;
        ty.walk(&mut |t| {
            let found = match t {
                TypeDescriptor::Record(name) => self.record(name).is_some(),
                TypeDescriptor::Enum(name) => self.enum_def(name).is_some(),
                TypeDescriptor::ExternalHandle(name) => self.handle(name).is_some(),
                _ => true,
            };
            ok &= found;
        });
        ok
    }

    /// Hex SHA-256 fingerprint of the whole interface.
    pub fn fingerprint(&self) -> String {
        hash_hex(&content_hash(self))
    }

    fn ensure_new_type(&self, name: &str) -> Result<()> {
        if self.kind_of(name).is_some() {
            return Err(ModelError::DuplicateType {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_unique<'a>(owner: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ModelError::DuplicateMember {
                owner: owner.to_string(),
                member: name.to_string(),
            });
        }
    }
    Ok(())
}
