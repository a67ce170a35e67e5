//! Per-run generation context.
//!
//! A [`GenerationContext`] is built fresh for every generation run and
//! dropped afterwards. Construction performs every semantic check, so the
//! renderers that consume it only format text and cannot fail.

use std::collections::{BTreeMap, BTreeSet};

use hbind_model::{FunctionSignature, InterfaceModel, ModelError, RecordDef, TypeDescriptor};

use crate::abi::AbiVersion;
use crate::ctype::CType;
use crate::error::{HeaderError, Result};
use crate::ident::{check_global, sanitize_locals, screaming_snake};
use crate::marshal::{alias_prefix, compound_alias, ctype_for};
use crate::options::{GeneratorOptions, GuardStyle};
use crate::order::sort_records;

/// Global C names claimed by the header, each with the item that owns it.
#[derive(Debug, Default)]
pub struct SymbolTable {
    owners: BTreeMap<String, String>,
}

impl SymbolTable {
    /// Claim a file-scope name. Fails if it is not a usable identifier or is
    /// already claimed.
    pub fn claim(&mut self, name: &str, owner: impl Into<String>) -> Result<()> {
        let owner = owner.into();
        check_global(name, &owner)?;
        if let Some(existing) = self.owners.get(name) {
            return Err(HeaderError::invalid_identifier(
                name,
                owner,
                format!("collides with {existing}"),
            ));
        }
        self.owners.insert(name.to_string(), owner);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// A function that survived de-duplication, with its sanitized parameter names.
#[derive(Debug)]
pub struct PreparedFunction<'m> {
    pub signature: &'m FunctionSignature,
    pub param_names: Vec<String>,
}

/// Everything one generation run needs, validated.
#[derive(Debug)]
pub struct GenerationContext<'m> {
    model: &'m InterfaceModel,
    options: &'m GeneratorOptions,
    symbols: SymbolTable,
    functions: Vec<PreparedFunction<'m>>,
    field_names: BTreeMap<&'m str, Vec<String>>,
    records: Vec<&'m RecordDef>,
    aliases: Vec<&'m TypeDescriptor>,
    alias_prefix: String,
}

impl<'m> GenerationContext<'m> {
    /// Validate the model against the options and build the context.
    pub fn new(model: &'m InterfaceModel, options: &'m GeneratorOptions) -> Result<Self> {
        check_global(model.namespace(), "library namespace")?;

        let mut ctx = GenerationContext {
            model,
            options,
            symbols: SymbolTable::default(),
            functions: Vec::new(),
            field_names: BTreeMap::new(),
            records: Vec::new(),
            aliases: Vec::new(),
            alias_prefix: alias_prefix(model.namespace()),
        };

        ctx.check_references()?;
        ctx.check_enums()?;
        ctx.prepare_functions()?;
        ctx.records = sort_records(model)?;
        ctx.collect_aliases();
        ctx.sanitize_names()?;
        ctx.claim_symbols()?;

        tracing::debug!(
            namespace = model.namespace(),
            functions = ctx.functions.len(),
            aliases = ctx.aliases.len(),
            symbols = ctx.symbols.len(),
            "generation context ready"
        );
        Ok(ctx)
    }

    pub fn model(&self) -> &'m InterfaceModel {
        self.model
    }

    pub fn options(&self) -> &GeneratorOptions {
        self.options
    }

    pub fn abi(&self) -> AbiVersion {
        self.options.abi
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Functions to declare, de-duplicated, in declaration order.
    pub fn functions(&self) -> &[PreparedFunction<'m>] {
        &self.functions
    }

    /// Records in dependency order.
    pub fn records(&self) -> &[&'m RecordDef] {
        &self.records
    }

    /// Distinct compound types, in first-use order.
    pub fn aliases(&self) -> &[&'m TypeDescriptor] {
        &self.aliases
    }

    /// Sanitized field names of a record, in layout order.
    pub fn field_names(&self, record: &RecordDef) -> &[String] {
        self.field_names
            .get(record.name.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// C type of a value of `ty`.
    pub fn ctype(&self, ty: &TypeDescriptor) -> CType {
        ctype_for(ty, &self.alias_prefix)
    }

    /// Alias name of a compound type.
    pub fn alias_name(&self, ty: &TypeDescriptor) -> String {
        compound_alias(ty, &self.alias_prefix)
    }

    /// The include-guard macro.
    pub fn guard_macro(&self) -> String {
        self.options.guard_macro(self.model.namespace())
    }

    /// Exported symbol of a function.
    pub fn function_symbol(&self, function: &FunctionSignature) -> String {
        format!("{}{}", self.model.library.symbol_prefix, function.name)
    }

    /// Prefix of the scaffolding functions every library exports.
    ///
    /// Falls back to `<namespace>_` so scaffolding never lands unprefixed.
    pub fn scaffolding_prefix(&self) -> String {
        let prefix = &self.model.library.symbol_prefix;
        if prefix.is_empty() {
            format!("{}_", self.model.namespace())
        } else {
            prefix.clone()
        }
    }

    pub fn scaffolding_symbol(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.scaffolding_prefix())
    }

    pub fn checksum_symbol(&self, function: &FunctionSignature) -> String {
        self.scaffolding_symbol(&format!("checksum_{}", function.name))
    }

    pub fn handle_free_symbol(&self, handle: &str) -> String {
        self.scaffolding_symbol(&format!("{}_free", screaming_snake(handle).to_lowercase()))
    }

    /// Constant name of an enum variant, e.g. `SHAPE_CIRCLE`.
    pub fn enum_constant(&self, enum_name: &str, variant: &str) -> String {
        format!("{}_{}", screaming_snake(enum_name), screaming_snake(variant))
    }

    fn check_references(&self) -> Result<()> {
        for record in &self.model.records {
            for field in &record.fields {
                self.check_resolves(&field.ty, || {
                    format!("field '{}.{}'", record.name, field.name)
                })?;
            }
        }
        for function in &self.model.functions {
            for param in &function.params {
                self.check_resolves(&param.ty, || {
                    format!("parameter '{}' of function '{}'", param.name, function.name)
                })?;
            }
            if let Some(ret) = &function.returns {
                self.check_resolves(ret, || {
                    format!("return type of function '{}'", function.name)
                })?;
            }
        }
        Ok(())
    }

    fn check_resolves(
        &self,
        ty: &TypeDescriptor,
        referenced_by: impl Fn() -> String,
    ) -> Result<()> {
        let mut missing = None;
        ty.walk(&mut |t| {
            if missing.is_none() && !t.is_compound() && !self.model.resolves(t) {
                missing = t.referenced_name().map(str::to_string);
            }
        });
        match missing {
            Some(name) => Err(HeaderError::UnresolvedType {
                name,
                referenced_by: referenced_by(),
            }),
            None => Ok(()),
        }
    }

    /// Enums without variants would render as an empty C enum. Models built
    /// through `add_enum` never have one, but the fields are public.
    fn check_enums(&self) -> Result<()> {
        match self.model.enums.iter().find(|def| def.variants.is_empty()) {
            Some(def) => Err(ModelError::EmptyEnum {
                name: def.name.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }

    fn prepare_functions(&mut self) -> Result<()> {
        let model = self.model;
        let mut by_name: BTreeMap<&str, &FunctionSignature> = BTreeMap::new();
        for function in &model.functions {
            if let Some(first) = by_name.get(function.name.as_str()) {
                if first.same_shape(function) {
                    tracing::debug!(function = %function.name, "dropping identical redeclaration");
                    continue;
                }
                return Err(HeaderError::SignatureMismatch {
                    name: function.name.clone(),
                    first: describe(first),
                    second: describe(function),
                });
            }
            by_name.insert(&function.name, function);
            self.functions.push(PreparedFunction {
                signature: function,
                param_names: Vec::new(),
            });
        }
        Ok(())
    }

    /// Type and macro names a field or parameter must not hide.
    fn shadowable_names(&self) -> BTreeSet<String> {
        let model = self.model;
        let mut names: BTreeSet<String> = model
            .records
            .iter()
            .map(|r| r.name.clone())
            .chain(model.enums.iter().map(|e| e.name.clone()))
            .chain(model.handles.iter().map(|h| h.name.clone()))
            .chain(self.aliases.iter().map(|ty| self.alias_name(ty)))
            .collect();
        if self.options.guard == GuardStyle::Ifndef {
            names.insert(self.guard_macro());
        }
        names
    }

    fn sanitize_names(&mut self) -> Result<()> {
        let model = self.model;
        let shadowable = self.shadowable_names();
        for function in &mut self.functions {
            let sig = function.signature;
            function.param_names = sanitize_locals(
                sig.params.iter().map(|p| p.name.as_str()),
                &format!("function '{}'", sig.name),
                &shadowable,
            )?;
        }
        for record in &model.records {
            let names = sanitize_locals(
                record.fields.iter().map(|f| f.name.as_str()),
                &format!("record '{}'", record.name),
                &shadowable,
            )?;
            self.field_names.insert(&record.name, names);
        }
        Ok(())
    }

    fn collect_aliases(&mut self) {
        let model = self.model;
        let fields = model.records.iter().flat_map(|r| r.fields.iter().map(|f| &f.ty));
        let signatures: Vec<&'m FunctionSignature> =
            self.functions.iter().map(|f| f.signature).collect();
        let signatures = signatures.into_iter().flat_map(|s| s.types());
        for ty in fields.chain(signatures) {
            if ty.is_compound() && !self.aliases.contains(&ty) {
                self.aliases.push(ty);
            }
        }
    }

    fn claim_symbols(&mut self) -> Result<()> {
        let model = self.model;
        let mut symbols = SymbolTable::default();

        if self.options.guard == GuardStyle::Ifndef {
            symbols.claim(&self.guard_macro(), "include guard")?;
        }
        for handle in &model.handles {
            symbols.claim(&handle.name, format!("handle '{}'", handle.name))?;
        }
        for def in &model.enums {
            symbols.claim(&def.name, format!("enum '{}'", def.name))?;
            for variant in &def.variants {
                symbols.claim(
                    &self.enum_constant(&def.name, &variant.name),
                    format!("variant '{}.{}'", def.name, variant.name),
                )?;
            }
        }
        for record in &model.records {
            symbols.claim(&record.name, format!("record '{}'", record.name))?;
        }
        for ty in &self.aliases {
            symbols.claim(&self.alias_name(ty), format!("alias of '{ty}'"))?;
        }

        symbols.claim(
            &self.scaffolding_symbol("contract_version"),
            "contract version function",
        )?;
        let buffer_functions = [
            "rustbuffer_alloc",
            "rustbuffer_from_bytes",
            "rustbuffer_free",
            "rustbuffer_reserve",
        ];
        for suffix in buffer_functions {
            symbols.claim(&self.scaffolding_symbol(suffix), "buffer management function")?;
        }
        for handle in &model.handles {
            symbols.claim(
                &self.handle_free_symbol(&handle.name),
                format!("release function of handle '{}'", handle.name),
            )?;
        }
        for init in &model.library.initializers {
            symbols.claim(init, format!("initializer '{init}'"))?;
        }
        for function in &self.functions {
            let sig = function.signature;
            symbols.claim(&self.function_symbol(sig), format!("function '{}'", sig.name))?;
            if self.options.emit_checksums {
                symbols.claim(
                    &self.checksum_symbol(sig),
                    format!("checksum of function '{}'", sig.name),
                )?;
            }
        }

        self.symbols = symbols;
        Ok(())
    }
}

/// One-line description of a signature for error messages.
fn describe(function: &FunctionSignature) -> String {
    let params: Vec<String> = function.params.iter().map(|p| p.ty.to_string()).collect();
    let ret = function
        .returns
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "void".to_string());
    format!("{}({}) -> {ret} [{}]", function.name, params.join(", "), function.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbind_model::{EnumDef, ErrorConvention, HandleDef, Primitive};

    fn i32() -> TypeDescriptor {
        TypeDescriptor::primitive(Primitive::I32)
    }

    fn geometry() -> InterfaceModel {
        let mut model = InterfaceModel::new("geometry").with_symbol_prefix("geometry_");
        model
            .add_record(RecordDef::new("Point").field("x", i32()).field("y", i32()))
            .unwrap();
        model.add_function(
            FunctionSignature::new("distance")
                .param("a", TypeDescriptor::record("Point"))
                .param("b", TypeDescriptor::record("Point"))
                .returns(TypeDescriptor::primitive(Primitive::F64)),
        );
        model
    }

    #[test]
    fn builds_for_valid_model() {
        let model = geometry();
        let opts = GeneratorOptions::default();
        let ctx = GenerationContext::new(&model, &opts).unwrap();
        assert_eq!(ctx.functions().len(), 1);
        assert!(ctx.symbols().contains("geometry_distance"));
        assert!(ctx.symbols().contains("geometry_checksum_distance"));
        assert!(ctx.symbols().contains("GEOMETRY_H"));
        assert_eq!(ctx.function_symbol(ctx.functions()[0].signature), "geometry_distance");
    }

    #[test]
    fn unresolved_field_reports_owner() {
        let mut model = InterfaceModel::new("geometry");
        model
            .add_record(RecordDef::new("Segment").field("from", TypeDescriptor::record("Point")))
            .unwrap();
        let opts = GeneratorOptions::default();
        let err = GenerationContext::new(&model, &opts).unwrap_err();
        match err {
            HeaderError::UnresolvedType { name, referenced_by } => {
                assert_eq!(name, "Point");
                assert_eq!(referenced_by, "field 'Segment.from'");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unresolved_nested_in_compound() {
        let mut model = InterfaceModel::new("geometry");
        model.add_function(
            FunctionSignature::new("f")
                .returns(TypeDescriptor::sequence(TypeDescriptor::handle("Gone"))),
        );
        let opts = GeneratorOptions::default();
        let err = GenerationContext::new(&model, &opts).unwrap_err();
        assert!(err.to_string().contains("'Gone'"));
        assert!(err.to_string().contains("return type of function 'f'"));
    }

    #[test]
    fn identical_duplicates_collapse() {
        let mut model = geometry();
        model.add_function(
            FunctionSignature::new("distance")
                .param("p", TypeDescriptor::record("Point"))
                .param("q", TypeDescriptor::record("Point"))
                .returns(TypeDescriptor::primitive(Primitive::F64)),
        );
        let opts = GeneratorOptions::default();
        let ctx = GenerationContext::new(&model, &opts).unwrap();
        assert_eq!(ctx.functions().len(), 1);
        assert_eq!(ctx.functions()[0].param_names, vec!["a", "b"]);
    }

    #[test]
    fn conflicting_duplicates_rejected() {
        let mut model = geometry();
        model.add_function(
            FunctionSignature::new("distance")
                .param("a", TypeDescriptor::record("Point"))
                .returns(TypeDescriptor::primitive(Primitive::F64))
                .with_error(ErrorConvention::Sentinel),
        );
        let opts = GeneratorOptions::default();
        let err = GenerationContext::new(&model, &opts).unwrap_err();
        assert!(matches!(
            err,
            HeaderError::SignatureMismatch { ref name, .. } if name == "distance"
        ));
        assert!(err.to_string().contains("distance(Point, Point) -> f64 [out-param]"));
    }

    #[test]
    fn symbol_collisions_rejected() {
        // Enum constant SHAPE_CIRCLE collides with a record of the same name.
        let mut model = InterfaceModel::new("geometry");
        model.add_enum(EnumDef::new("Shape").variant("Circle")).unwrap();
        model.add_record(RecordDef::new("SHAPE_CIRCLE")).unwrap();
        let opts = GeneratorOptions::default();
        let err = GenerationContext::new(&model, &opts).unwrap_err();
        assert!(err.to_string().contains("collides with variant 'Shape.Circle'"));
    }

    #[test]
    fn reserved_and_keyword_globals_rejected() {
        for name in ["struct", "RustBuffer", "__hidden"] {
            let mut model = InterfaceModel::new("geometry");
            model.add_handle(HandleDef::new(name)).unwrap();
            let opts = GeneratorOptions::default();
            let err = GenerationContext::new(&model, &opts).unwrap_err();
            assert!(matches!(err, HeaderError::InvalidIdentifier { .. }), "{name}");
        }
        let model = InterfaceModel::new("bad-namespace");
        let opts = GeneratorOptions::default();
        assert!(GenerationContext::new(&model, &opts).is_err());
    }

    #[test]
    fn aliases_in_first_use_order() {
        let mut model = InterfaceModel::new("geometry");
        model
            .add_record(
                RecordDef::new("Bag")
                    .field("items", TypeDescriptor::sequence(i32()))
                    .field("label", TypeDescriptor::optional(TypeDescriptor::Buffer)),
            )
            .unwrap();
        model.add_function(
            FunctionSignature::new("fill")
                .param("items", TypeDescriptor::sequence(i32()))
                .returns(TypeDescriptor::map(TypeDescriptor::Buffer, i32())),
        );
        let opts = GeneratorOptions::default();
        let ctx = GenerationContext::new(&model, &opts).unwrap();
        let names: Vec<String> = ctx.aliases().iter().map(|t| ctx.alias_name(t)).collect();
        assert_eq!(
            names,
            vec!["GeometrySequenceI32", "GeometryOptionalBytes", "GeometryMapBytesI32"]
        );
    }

    #[test]
    fn scaffolding_prefix_falls_back_to_namespace() {
        let mut model = InterfaceModel::new("geometry");
        model.add_handle(HandleDef::new("DrawCanvas")).unwrap();
        let opts = GeneratorOptions::default();
        let ctx = GenerationContext::new(&model, &opts).unwrap();
        assert_eq!(ctx.scaffolding_symbol("contract_version"), "geometry_contract_version");
        assert_eq!(ctx.handle_free_symbol("DrawCanvas"), "geometry_draw_canvas_free");
    }

    #[test]
    fn keyword_params_sanitized() {
        let mut model = InterfaceModel::new("geometry");
        model.add_function(
            FunctionSignature::new("f")
                .param("default", i32())
                .param("out_status", i32()),
        );
        let opts = GeneratorOptions::default();
        let ctx = GenerationContext::new(&model, &opts).unwrap();
        assert_eq!(ctx.functions()[0].param_names, vec!["default_", "out_status_"]);
    }

    #[test]
    fn locals_named_like_types_renamed() {
        let mut model = geometry();
        model.add_enum(EnumDef::new("Color").variant("Red")).unwrap();
        model
            .add_record(
                RecordDef::new("Stroke")
                    .field("Color", TypeDescriptor::enumeration("Color"))
                    .field("c2", TypeDescriptor::enumeration("Color"))
                    .field("Stroke", TypeDescriptor::sequence(i32())),
            )
            .unwrap();
        model.add_function(
            FunctionSignature::new("dist")
                .param("Point", TypeDescriptor::record("Point"))
                .param("b", TypeDescriptor::record("Point")),
        );
        model.add_function(
            FunctionSignature::new("g")
                .param("RustCallStatus", i32())
                .param("GeometrySequenceI32", i32())
                .param("GEOMETRY_H", i32()),
        );
        let opts = GeneratorOptions::default();
        let ctx = GenerationContext::new(&model, &opts).unwrap();

        let stroke = model.record("Stroke").unwrap();
        assert_eq!(ctx.field_names(stroke), ["Color_", "c2", "Stroke_"]);
        assert_eq!(ctx.functions()[1].param_names, vec!["Point_", "b"]);
        assert_eq!(
            ctx.functions()[2].param_names,
            vec!["RustCallStatus_", "GeometrySequenceI32_", "GEOMETRY_H_"]
        );
    }

    #[test]
    fn empty_enum_rejected_without_builder() {
        let mut model = InterfaceModel::new("geometry");
        model.enums.push(EnumDef::new("Nothing"));
        let opts = GeneratorOptions::default();
        let err = GenerationContext::new(&model, &opts).unwrap_err();
        assert!(matches!(
            err,
            HeaderError::Model(ModelError::EmptyEnum { ref name }) if name == "Nothing"
        ));
    }

    #[test]
    fn standard_macro_constants_rejected() {
        let mut model = InterfaceModel::new("geometry");
        model
            .add_enum(EnumDef::new("Size").variant("Small").variant("Max"))
            .unwrap();
        let opts = GeneratorOptions::default();
        let err = GenerationContext::new(&model, &opts).unwrap_err();
        match err {
            HeaderError::InvalidIdentifier { name, .. } => assert_eq!(name, "SIZE_MAX"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
