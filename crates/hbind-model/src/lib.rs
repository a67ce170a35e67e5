//! Language-neutral interface model for C binding-header generation.
//!
//! ## Modules
//!
//! - [`types`]: Type descriptors and primitives
//! - [`model`]: The interface model (records, enums, handles, functions)
//! - [`convention`]: Error-signaling conventions
//! - [`typeexpr`]: Type expression parser
//! - [`declaration`]: `.hbind.toml` interface file loading
//! - [`hash`]: Content fingerprints and signature checksums

pub mod convention;
pub mod declaration;
pub mod error;
pub mod hash;
pub mod model;
pub mod typeexpr;
pub mod types;

pub use convention::ErrorConvention;
pub use declaration::{load_model, InterfaceDeclaration};
pub use error::ModelError;
pub use model::{
    EnumDef, FieldDef, FunctionSignature, HandleDef, InterfaceModel, LibraryInfo, NamedKind,
    Param, RecordDef, VariantDef,
};
pub use types::{Primitive, TypeDescriptor};
