//! Header generation error types.
//!
//! Every variant is fatal to a generation run: a header is either emitted
//! complete or not at all.

use hbind_model::ModelError;

/// Errors that can occur while generating a C header.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// A signature or field references a type the interface does not define.
    #[error("unresolved type '{name}' referenced by {referenced_by}")]
    UnresolvedType { name: String, referenced_by: String },

    /// Records embed each other by value in a cycle.
    #[error("cyclic value types: {}", .path.join(" -> "))]
    CyclicType { path: Vec<String> },

    /// Two functions share a name but not a signature.
    #[error("function '{name}' is declared with conflicting signatures: {first} vs {second}")]
    SignatureMismatch {
        name: String,
        first: String,
        second: String,
    },

    /// A name is not usable as a C identifier.
    #[error("invalid identifier '{name}' for {context}: {reason}")]
    InvalidIdentifier {
        name: String,
        context: String,
        reason: String,
    },

    /// Interface model error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeaderError {
    pub(crate) fn invalid_identifier(
        name: impl Into<String>,
        context: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HeaderError::InvalidIdentifier {
            name: name.into(),
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for header generation.
pub type Result<T> = std::result::Result<T, HeaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = HeaderError::CyclicType {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic value types: A -> B -> A");
    }

    #[test]
    fn model_errors_convert() {
        let err: HeaderError = ModelError::EmptyEnum { name: "E".into() }.into();
        assert!(err.to_string().contains("enum 'E' has no variants"));
    }
}
