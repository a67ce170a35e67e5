//! Interface model error types.

/// Errors that can occur while building or loading an interface model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A type expression in an interface file could not be parsed.
    #[error("invalid type expression '{input}': {detail}")]
    InvalidTypeExpr { input: String, detail: String },

    /// An interface file is structurally invalid.
    #[error("invalid interface declaration: {detail}")]
    InvalidDeclaration { detail: String },

    /// Two type definitions share a name.
    #[error("duplicate type '{name}'")]
    DuplicateType { name: String },

    /// A record field or enum variant name is repeated within its owner.
    #[error("duplicate member '{member}' in '{owner}'")]
    DuplicateMember { owner: String, member: String },

    /// An enum was declared without variants.
    #[error("enum '{name}' has no variants")]
    EmptyEnum { name: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
