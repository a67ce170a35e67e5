//! Type declarations: handles, enums, compound aliases, and records.

use hbind_model::{EnumDef, HandleDef, RecordDef, TypeDescriptor};

use crate::abi::RUST_BUFFER;
use crate::context::GenerationContext;
use crate::ctype::CType;
use crate::fragment::{sequence, Fragment, Section};
use crate::render::maybe_docs;

/// Declare a single type. Primitives and buffers need no declaration and
/// yield an empty string.
pub fn declare(ctx: &GenerationContext<'_>, ty: &TypeDescriptor) -> String {
    let model = ctx.model();
    match ty {
        TypeDescriptor::Primitive(_) | TypeDescriptor::Buffer => String::new(),
        TypeDescriptor::Record(name) => model
            .record(name)
            .map(|r| declare_record(ctx, r))
            .unwrap_or_default(),
        TypeDescriptor::Enum(name) => model
            .enum_def(name)
            .map(|e| declare_enum(ctx, e))
            .unwrap_or_default(),
        TypeDescriptor::ExternalHandle(name) => model
            .handle(name)
            .map(|h| declare_handle(ctx, h))
            .unwrap_or_default(),
        TypeDescriptor::Optional(_) | TypeDescriptor::Sequence(_) | TypeDescriptor::Map(..) => {
            declare_alias(ctx, ty)
        }
    }
}

/// Render every type declaration in dependency order.
pub fn render(ctx: &GenerationContext<'_>) -> Vec<Fragment> {
    let model = ctx.model();
    let handles = model.handles.iter().map(|h| TypeDescriptor::handle(h.name.as_str()));
    let enums = model.enums.iter().map(|e| TypeDescriptor::enumeration(e.name.as_str()));
    let aliases = ctx.aliases().iter().map(|t| (*t).clone());
    let records = ctx.records().iter().map(|r| TypeDescriptor::record(r.name.as_str()));

    let texts: Vec<String> = handles
        .chain(enums)
        .chain(aliases)
        .chain(records)
        .map(|ty| declare(ctx, &ty))
        .collect();
    tracing::debug!(declarations = texts.len(), "rendered type declarations");
    sequence(Section::Types, texts)
}

fn declare_handle(ctx: &GenerationContext<'_>, handle: &HandleDef) -> String {
    let mut out = maybe_docs(handle.docs.as_deref(), ctx.options().emit_docs, "");
    out.push_str(&format!(
        "/* Owned by the library; release with {}(). */\ntypedef struct {name} {name};",
        ctx.handle_free_symbol(&handle.name),
        name = handle.name,
    ));
    out
}

fn declare_enum(ctx: &GenerationContext<'_>, def: &EnumDef) -> String {
    let emit_docs = ctx.options().emit_docs;
    let mut out = maybe_docs(def.docs.as_deref(), emit_docs, "");
    out.push_str(&format!(
        "enum {}\n#ifdef __cplusplus\n  : {}\n#endif /* __cplusplus */\n{{\n",
        def.name,
        CType::Int32
    ));
    for (discriminant, variant) in def.discriminants() {
        out.push_str(&maybe_docs(variant.docs.as_deref(), emit_docs, "    "));
        out.push_str(&format!(
            "    {} = {discriminant},\n",
            ctx.enum_constant(&def.name, &variant.name)
        ));
    }
    out.push_str(&format!(
        "}};\n#ifndef __cplusplus\ntypedef {} {};\n#endif /* __cplusplus */",
        CType::Int32,
        def.name
    ));
    out
}

fn declare_alias(ctx: &GenerationContext<'_>, ty: &TypeDescriptor) -> String {
    format!(
        "/** Serialized {ty}. */\ntypedef {RUST_BUFFER} {};",
        ctx.alias_name(ty)
    )
}

fn declare_record(ctx: &GenerationContext<'_>, record: &RecordDef) -> String {
    let emit_docs = ctx.options().emit_docs;
    let mut out = maybe_docs(record.docs.as_deref(), emit_docs, "");
    out.push_str(&format!("typedef struct {} {{\n", record.name));
    if record.fields.is_empty() {
        // Empty structs are not valid C.
        out.push_str("    uint8_t _reserved;\n");
    }
    for (field, name) in record.fields.iter().zip(ctx.field_names(record)) {
        out.push_str(&maybe_docs(field.docs.as_deref(), emit_docs, "    "));
        out.push_str(&format!("    {};\n", ctx.ctype(&field.ty).declare(name)));
    }
    out.push_str(&format!("}} {};", record.name));
    out
}
