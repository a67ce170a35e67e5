//! Library declarations: load-time checks, buffer management, handle
//! release, and one prototype per exported function.

use hbind_model::{ErrorConvention, FunctionSignature};

use crate::abi::{FOREIGN_BYTES, RUST_BUFFER, RUST_CALL_STATUS, STATUS_PARAM};
use crate::context::{GenerationContext, PreparedFunction};
use crate::ctype::CType;
use crate::fragment::{sequence, Fragment, Section};
use crate::marshal::{pass_strategy, PassStrategy};
use crate::render::doc_comment;

fn status_param() -> String {
    CType::pointer(CType::named(RUST_CALL_STATUS)).declare(STATUS_PARAM)
}

fn prototype(ret: &CType, symbol: &str, params: &[String]) -> String {
    let params = if params.is_empty() {
        "void".to_string()
    } else {
        params.join(", ")
    };
    format!("{};", ret.declare(&format!("{symbol}({params})")))
}

/// Render all library declarations in a fixed order.
pub fn render(ctx: &GenerationContext<'_>) -> Vec<Fragment> {
    let mut texts = vec![contract(ctx)];
    if ctx.options().emit_checksums && !ctx.functions().is_empty() {
        texts.push(checksums(ctx));
    }
    texts.push(buffer_management(ctx));
    if !ctx.model().handles.is_empty() {
        texts.push(handle_release(ctx));
    }
    texts.extend(ctx.functions().iter().map(|f| function(ctx, f)));
    tracing::debug!(fragments = texts.len(), "rendered library declarations");
    sequence(Section::Library, texts)
}

fn contract(ctx: &GenerationContext<'_>) -> String {
    let initializers = &ctx.model().library.initializers;
    let mut note = format!(
        "Load-time contract. These conditions are checked at run time; the\n\
         header cannot enforce them.\n\n\
         {}() must return {}.",
        ctx.scaffolding_symbol("contract_version"),
        ctx.abi().number()
    );
    if ctx.options().emit_checksums && !ctx.functions().is_empty() {
        note.push_str(&format!(
            "\nEach {}checksum_*() function must return the value noted beside it.",
            ctx.scaffolding_prefix()
        ));
    }
    if !initializers.is_empty() {
        note.push_str("\nCall the initializers below, in order, before any other function.");
    }

    let mut out = doc_comment(&note, "").replacen("/**", "/*", 1);
    out.push_str(&prototype(
        &CType::UInt32,
        &ctx.scaffolding_symbol("contract_version"),
        &[],
    ));
    for init in initializers {
        out.push('\n');
        out.push_str(&prototype(&CType::Void, init, &[status_param()]));
    }
    out
}

fn checksums(ctx: &GenerationContext<'_>) -> String {
    ctx.functions()
        .iter()
        .map(|f| {
            format!(
                "{} /* expected: {} */",
                prototype(&CType::UInt16, &ctx.checksum_symbol(f.signature), &[]),
                f.signature.checksum()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn buffer_management(ctx: &GenerationContext<'_>) -> String {
    let len = ctx.abi().buffer_length_type();
    let buffer = CType::named(RUST_BUFFER);
    let decls = [
        prototype(
            &buffer,
            &ctx.scaffolding_symbol("rustbuffer_alloc"),
            &[len.declare("size"), status_param()],
        ),
        prototype(
            &buffer,
            &ctx.scaffolding_symbol("rustbuffer_from_bytes"),
            &[CType::named(FOREIGN_BYTES).declare("bytes"), status_param()],
        ),
        prototype(
            &CType::Void,
            &ctx.scaffolding_symbol("rustbuffer_free"),
            &[buffer.declare("buf"), status_param()],
        ),
        prototype(
            &buffer,
            &ctx.scaffolding_symbol("rustbuffer_reserve"),
            &[buffer.declare("buf"), len.declare("additional"), status_param()],
        ),
    ];
    format!("/* Buffer management. */\n{}", decls.join("\n"))
}

fn handle_release(ctx: &GenerationContext<'_>) -> String {
    ctx.model()
        .handles
        .iter()
        .map(|h| {
            prototype(
                &CType::Void,
                &ctx.handle_free_symbol(&h.name),
                &[
                    CType::pointer(CType::named(h.name.as_str())).declare("ptr"),
                    status_param(),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ownership and error-signaling notes derived from the signature.
fn ownership_notes(ctx: &GenerationContext<'_>, prepared: &PreparedFunction<'_>) -> Vec<String> {
    let sig = prepared.signature;
    let mut notes = Vec::new();
    for (param, name) in sig.params.iter().zip(&prepared.param_names) {
        if pass_strategy(&param.ty) == PassStrategy::SerializedBuffer {
            notes.push(format!("`{name}` is consumed; the library frees it."));
        }
    }
    if let Some(ret) = &sig.returns {
        match (pass_strategy(ret), ret.referenced_name()) {
            (PassStrategy::SerializedBuffer, _) => notes.push(format!(
                "The returned buffer is owned by the caller; free it with {}().",
                ctx.scaffolding_symbol("rustbuffer_free")
            )),
            (PassStrategy::OpaquePointer, Some(handle)) => notes.push(format!(
                "The returned handle is owned by the caller; release it with {}().",
                ctx.handle_free_symbol(handle)
            )),
            _ => {}
        }
    }
    if sig.error == ErrorConvention::Sentinel {
        notes.push("Failure is signaled through the return value.".to_string());
    }
    notes
}

fn function(ctx: &GenerationContext<'_>, prepared: &PreparedFunction<'_>) -> String {
    let sig: &FunctionSignature = prepared.signature;

    let mut doc = Vec::new();
    if ctx.options().emit_docs {
        if let Some(text) = &sig.docs {
            doc.push(text.trim().to_string());
        }
    }
    let notes = ownership_notes(ctx, prepared);
    if !notes.is_empty() {
        doc.push(notes.join("\n"));
    }

    let mut params: Vec<String> = sig
        .params
        .iter()
        .zip(&prepared.param_names)
        .map(|(p, name)| ctx.ctype(&p.ty).declare(name))
        .collect();
    if sig.error.has_status_param() {
        params.push(status_param());
    }
    let ret = sig
        .returns
        .as_ref()
        .map(|t| ctx.ctype(t))
        .unwrap_or(CType::Void);

    let mut out = doc_comment(&doc.join("\n\n"), "");
    out.push_str(&prototype(&ret, &ctx.function_symbol(sig), &params));
    out
}
