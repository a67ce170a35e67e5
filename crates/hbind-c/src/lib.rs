//! C binding-header generation for hbind interface models.
//!
//! Turns an [`InterfaceModel`] into one self-contained C header declaring the
//! foreign library's runtime buffer type, call-status convention, data types,
//! and exported functions.
//!
//! ## Modules
//!
//! - [`abi`]: ABI versions of the runtime declarations
//! - [`options`]: Generator options
//! - [`context`]: Per-run validation and symbol table
//! - [`marshal`]: Interface type to C type mapping
//! - [`order`]: Dependency ordering of records
//! - [`render`]: Fragment renderers
//! - [`assemble`]: Fragment ordering and joining
//! - [`output`]: Atomic header writes

pub mod abi;
pub mod assemble;
pub mod context;
pub mod ctype;
pub mod error;
pub mod fragment;
pub mod ident;
pub mod marshal;
pub mod options;
pub mod order;
pub mod output;
pub mod render;

use hbind_model::InterfaceModel;

pub use abi::AbiVersion;
pub use context::GenerationContext;
pub use ctype::CType;
pub use error::HeaderError;
pub use options::{GeneratorOptions, GuardStyle};
pub use output::{write_header, WriteOutcome};

/// Generate the complete header text for a model.
///
/// Pure: the same model and options always give byte-identical output.
/// On error nothing is produced.
pub fn generate_header(
    model: &InterfaceModel,
    options: &GeneratorOptions,
) -> error::Result<String> {
    let ctx = GenerationContext::new(model, options)?;

    let mut fragments = assemble::frame(&ctx);
    fragments.push(render::buffer::render(ctx.abi()));
    fragments.push(render::helpers::render(ctx.abi()));
    fragments.extend(render::types::render(&ctx));
    fragments.extend(render::loader::render(&ctx));
    tracing::debug!(
        namespace = model.namespace(),
        fragments = fragments.len(),
        "assembling header"
    );

    Ok(assemble::assemble(fragments))
}
