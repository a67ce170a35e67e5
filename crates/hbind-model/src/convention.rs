//! Error-signaling conventions for foreign functions.

use serde::{Deserialize, Serialize};

/// How a foreign function reports failure to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorConvention {
    /// A trailing `RustCallStatus *out_status` parameter receives the outcome.
    #[default]
    OutParam,
    /// Failure is signaled in-band by a documented sentinel return value;
    /// no status parameter is passed.
    Sentinel,
}

impl ErrorConvention {
    /// Whether functions with this convention take a trailing status out-parameter.
    pub fn has_status_param(&self) -> bool {
        matches!(self, Self::OutParam)
    }
}

impl std::fmt::Display for ErrorConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutParam => write!(f, "out-param"),
            Self::Sentinel => write!(f, "sentinel"),
        }
    }
}
