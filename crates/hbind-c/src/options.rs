//! Generator options for a header generation run.

use serde::{Deserialize, Serialize};

use crate::abi::AbiVersion;
use crate::ident::screaming_snake;

/// How the header protects against repeated inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardStyle {
    /// `#ifndef NAME_H` / `#define NAME_H` / `#endif` (portable C).
    #[default]
    Ifndef,
    /// `#pragma once` (widely supported, not standard C).
    PragmaOnce,
}

impl GuardStyle {
    /// Parse a guard style from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ifndef" => Some(Self::Ifndef),
            "pragma-once" | "pragma" => Some(Self::PragmaOnce),
            _ => None,
        }
    }
}

impl std::fmt::Display for GuardStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ifndef => write!(f, "ifndef"),
            Self::PragmaOnce => write!(f, "pragma-once"),
        }
    }
}

/// Options controlling a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratorOptions {
    /// Buffer and call-status layout revision.
    #[serde(default)]
    pub abi: AbiVersion,
    /// Include-guard style.
    #[serde(default)]
    pub guard: GuardStyle,
    /// Explicit guard macro; derived from the namespace when absent.
    #[serde(default)]
    pub guard_name: Option<String>,
    /// Emit per-function checksum declarations.
    #[serde(default = "default_true")]
    pub emit_checksums: bool,
    /// Emit doc comments from the interface.
    #[serde(default = "default_true")]
    pub emit_docs: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            abi: AbiVersion::default(),
            guard: GuardStyle::default(),
            guard_name: None,
            emit_checksums: true,
            emit_docs: true,
        }
    }
}

impl GeneratorOptions {
    /// The include-guard macro for a namespace.
    pub fn guard_macro(&self, namespace: &str) -> String {
        match &self.guard_name {
            Some(name) => name.clone(),
            None => format!("{}_H", screaming_snake(namespace)),
        }
    }
}
