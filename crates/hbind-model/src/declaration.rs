//! Interface file (`.hbind.toml`) parsing.
//!
//! An interface file declares a foreign library's namespace and its exported
//! records, enums, handles, and functions. Types are written as type
//! expressions (see [`crate::typeexpr`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::convention::ErrorConvention;
use crate::error::{ModelError, Result};
use crate::model::{
    EnumDef, FieldDef, FunctionSignature, HandleDef, InterfaceModel, LibraryInfo, NamedKind,
    Param, RecordDef, VariantDef,
};
use crate::typeexpr::parse_type_expr;

/// The raw contents of an interface file, before type expressions are resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InterfaceDeclaration {
    /// Metadata about the foreign library.
    pub library: LibrarySection,
    #[serde(default)]
    pub records: Vec<RecordDecl>,
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub handles: Vec<HandleDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

/// The `[library]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LibrarySection {
    /// Interface namespace (e.g., "geometry").
    pub namespace: String,
    /// Prefix of every exported symbol (e.g., "geometry_").
    #[serde(default, alias = "symbol_prefix")]
    pub symbol_prefix: String,
    /// Functions that must run before any other call.
    #[serde(default)]
    pub initializers: Vec<String>,
    #[serde(default)]
    pub docs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<MemberDecl>,
    #[serde(default)]
    pub docs: Option<String>,
}

/// A record field or function parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub docs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<String>,
    #[serde(default)]
    pub docs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleDecl {
    pub name: String,
    #[serde(default)]
    pub docs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<MemberDecl>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub error: ErrorConvention,
    #[serde(default)]
    pub docs: Option<String>,
}

impl InterfaceDeclaration {
    /// Parse an interface declaration from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let decl: InterfaceDeclaration = toml::from_str(input).map_err(ModelError::Toml)?;

        if decl.library.namespace.trim().is_empty() {
            return Err(ModelError::InvalidDeclaration {
                detail: "library.namespace is required".to_string(),
            });
        }

        Ok(decl)
    }

    /// Parse an interface declaration from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Resolve type expressions and build the interface model.
    pub fn into_model(self) -> Result<InterfaceModel> {
        // Names are collected up front so declarations may reference types
        // declared later in the file.
        let mut kinds: BTreeMap<String, NamedKind> = BTreeMap::new();
        for r in &self.records {
            kinds.entry(r.name.clone()).or_insert(NamedKind::Record);
        }
        for e in &self.enums {
            kinds.entry(e.name.clone()).or_insert(NamedKind::Enum);
        }
        for h in &self.handles {
            kinds.entry(h.name.clone()).or_insert(NamedKind::Handle);
        }
        let kind_of = |name: &str| kinds.get(name).copied();

        let mut model = InterfaceModel::new(self.library.namespace.trim());
        model.library = LibraryInfo {
            namespace: self.library.namespace.trim().to_string(),
            symbol_prefix: self.library.symbol_prefix,
            initializers: self.library.initializers,
            docs: self.library.docs,
        };

        for h in self.handles {
            model.add_handle(HandleDef {
                name: h.name,
                docs: h.docs,
            })?;
        }

        for e in self.enums {
            model.add_enum(EnumDef {
                name: e.name,
                variants: e
                    .variants
                    .into_iter()
                    .map(|name| VariantDef { name, docs: None })
                    .collect(),
                docs: e.docs,
            })?;
        }

        for r in self.records {
            let fields = r
                .fields
                .into_iter()
                .map(|f| {
                    Ok(FieldDef {
                        ty: parse_type_expr(&f.ty, &kind_of)?,
                        name: f.name,
                        docs: f.docs,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            model.add_record(RecordDef {
                name: r.name,
                fields,
                docs: r.docs,
            })?;
        }

        for f in self.functions {
            let params = f
                .params
                .into_iter()
                .map(|p| {
                    Ok(Param {
                        ty: parse_type_expr(&p.ty, &kind_of)?,
                        name: p.name,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let returns = f
                .returns
                .as_deref()
                .map(|r| parse_type_expr(r, &kind_of))
                .transpose()?;
            model.add_function(FunctionSignature {
                name: f.name,
                params,
                returns,
                error: f.error,
                docs: f.docs,
            });
        }

        Ok(model)
    }
}

/// Load an interface file and build its model.
pub fn load_model(path: &std::path::Path) -> Result<InterfaceModel> {
    InterfaceDeclaration::load(path)?.into_model()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Primitive, TypeDescriptor};

    const GEOMETRY: &str = r#"
[library]
namespace = "geometry"
symbol-prefix = "geometry_"
initializers = ["geometry_init"]

[[records]]
name = "Segment"
fields = [{ name = "from", type = "Point" }, { name = "to", type = "Point" }]

[[records]]
name = "Point"
fields = [{ name = "x", type = "i32" }, { name = "y", type = "i32" }]

[[enums]]
name = "Shape"
variants = ["Circle", "Square"]

[[handles]]
name = "Canvas"

[[functions]]
name = "distance"
params = [{ name = "a", type = "Point" }, { name = "b", type = "Point" }]
returns = "f64"

[[functions]]
name = "canvas_draw"
params = [{ name = "canvas", type = "Canvas" }, { name = "shape", type = "Shape?" }]
error = "sentinel"
"#;

    #[test]
    fn parse_geometry_interface() {
        let model = InterfaceDeclaration::parse(GEOMETRY).unwrap().into_model().unwrap();
        assert_eq!(model.namespace(), "geometry");
        assert_eq!(model.library.symbol_prefix, "geometry_");
        assert_eq!(model.library.initializers, vec!["geometry_init"]);
        assert_eq!(model.records.len(), 2);
        // Forward reference to a later record resolves as a record.
        assert_eq!(model.records[0].fields[0].ty, TypeDescriptor::record("Point"));

        let distance = &model.functions[0];
        assert_eq!(distance.params.len(), 2);
        assert_eq!(
            distance.returns,
            Some(TypeDescriptor::primitive(Primitive::F64))
        );
        assert_eq!(distance.error, ErrorConvention::OutParam);

        let draw = &model.functions[1];
        assert_eq!(draw.params[0].ty, TypeDescriptor::handle("Canvas"));
        assert_eq!(
            draw.params[1].ty,
            TypeDescriptor::optional(TypeDescriptor::enumeration("Shape"))
        );
        assert_eq!(draw.error, ErrorConvention::Sentinel);
        assert!(draw.returns.is_none());
    }

    #[test]
    fn parse_minimal_interface() {
        let decl = InterfaceDeclaration::parse("[library]\nnamespace = \"empty\"\n").unwrap();
        let model = decl.into_model().unwrap();
        assert_eq!(model.namespace(), "empty");
        assert!(model.library.symbol_prefix.is_empty());
        assert!(model.functions.is_empty());
    }

    #[test]
    fn missing_library_section() {
        let toml = r#"
[[functions]]
name = "orphan"
"#;
        assert!(InterfaceDeclaration::parse(toml).is_err());
    }

    #[test]
    fn blank_namespace_rejected() {
        let err = InterfaceDeclaration::parse("[library]\nnamespace = \"  \"\n").unwrap_err();
        assert!(matches!(err, ModelError::InvalidDeclaration { .. }));
    }

    #[test]
    fn bad_type_expression_reported() {
        let toml = r#"
[library]
namespace = "bad"

[[functions]]
name = "f"
params = [{ name = "x", type = "sequence<" }]
"#;
        let err = InterfaceDeclaration::parse(toml).unwrap().into_model().unwrap_err();
        assert!(matches!(err, ModelError::InvalidTypeExpr { .. }));
    }

    #[test]
    fn duplicate_type_rejected() {
        let toml = r#"
[library]
namespace = "dup"

[[records]]
name = "Thing"

[[handles]]
name = "Thing"
"#;
        let err = InterfaceDeclaration::parse(toml).unwrap().into_model().unwrap_err();
        assert!(matches!(err, ModelError::DuplicateType { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geometry.hbind.toml");
        std::fs::write(&path, GEOMETRY).unwrap();
        let model = load_model(&path).unwrap();
        assert_eq!(model.functions.len(), 2);
    }
}
