//! ABI versions of the buffer and call-status layouts.
//!
//! The ABI version selects the fixed runtime declarations emitted into every
//! header. Headers generated for the same ABI version share those
//! declarations byte for byte.

use serde::{Deserialize, Serialize};

use crate::ctype::CType;

/// Layout revision of the runtime buffer and call-status types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiVersion {
    /// 32-bit signed buffer lengths.
    V1,
    /// 64-bit unsigned buffer lengths and a `cancelled` call status.
    #[default]
    V2,
}

impl AbiVersion {
    /// Every supported version, oldest first.
    pub const ALL: [AbiVersion; 2] = [AbiVersion::V1, AbiVersion::V2];

    /// Parse `"2"`, `"v2"`, or `"V2"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix(['v', 'V']).unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.number().to_string() == digits)
    }

    /// Numeric version, also the value the library's contract-version function returns.
    pub fn number(&self) -> u32 {
        match self {
            AbiVersion::V1 => 1,
            AbiVersion::V2 => 2,
        }
    }

    /// Type of `RustBuffer.capacity` and `RustBuffer.len`.
    pub fn buffer_length_type(&self) -> CType {
        match self {
            AbiVersion::V1 => CType::Int32,
            AbiVersion::V2 => CType::UInt64,
        }
    }

    /// Type of `ForeignBytes.len`.
    pub fn foreign_length_type(&self) -> CType {
        CType::Int32
    }

    /// Call-status codes as `(macro, value)` pairs.
    pub fn call_status_codes(&self) -> &'static [(&'static str, i8)] {
        const V1: &[(&str, i8)] = &[
            ("RUST_CALL_SUCCESS", 0),
            ("RUST_CALL_ERROR", 1),
            ("RUST_CALL_UNEXPECTED_ERROR", 2),
        ];
        const V2: &[(&str, i8)] = &[
            ("RUST_CALL_SUCCESS", 0),
            ("RUST_CALL_ERROR", 1),
            ("RUST_CALL_UNEXPECTED_ERROR", 2),
            ("RUST_CALL_CANCELLED", 3),
        ];
        match self {
            AbiVersion::V1 => V1,
            AbiVersion::V2 => V2,
        }
    }

    /// Guard macro protecting the shared buffer declarations.
    pub fn buffer_guard(&self) -> String {
        format!("HBIND_SHARED_ABI_V{}_H", self.number())
    }

    /// Guard macro protecting the shared call-status declarations.
    pub fn call_status_guard(&self) -> String {
        format!("HBIND_CALL_STATUS_ABI_V{}_H", self.number())
    }
}

impl std::fmt::Display for AbiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Names of the runtime types every header declares.
pub const RUST_BUFFER: &str = "RustBuffer";
pub const FOREIGN_BYTES: &str = "ForeignBytes";
pub const RUST_CALL_STATUS: &str = "RustCallStatus";

/// Name of the trailing status parameter under the out-param convention.
pub const STATUS_PARAM: &str = "out_status";
