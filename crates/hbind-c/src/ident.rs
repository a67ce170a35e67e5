//! C identifier validation and name mangling.
//!
//! Global names (types, functions, enum constants) must already be usable
//! as C identifiers and are rejected otherwise. Local names (fields and
//! parameters) are renamed instead when they would clash with a keyword,
//! a macro, or a type name in scope.

use std::collections::BTreeSet;

use crate::abi::{AbiVersion, FOREIGN_BYTES, RUST_BUFFER, RUST_CALL_STATUS, STATUS_PARAM};
use crate::error::{HeaderError, Result};

/// Keywords of C99 through C23.
const C_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "char", "const", "constexpr",
    "continue", "default", "do", "double", "else", "enum", "extern", "false", "float", "for",
    "goto", "if", "inline", "int", "long", "nullptr", "register", "restrict", "return",
    "short", "signed", "sizeof", "static", "static_assert", "struct", "switch",
    "thread_local", "true", "typedef", "typeof", "typeof_unqual", "union", "unsigned",
    "void", "volatile", "while",
];

/// C++ keywords, since headers are also consumed through `extern "C"`.
const CPP_KEYWORDS: &[&str] = &[
    "and", "and_eq", "asm", "bitand", "bitor", "catch", "char8_t", "char16_t", "char32_t",
    "class", "compl", "concept", "consteval", "constinit", "const_cast", "co_await",
    "co_return", "co_yield", "decltype", "delete", "dynamic_cast", "explicit", "export",
    "friend", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "operator", "or",
    "or_eq", "private", "protected", "public", "reinterpret_cast", "requires",
    "static_cast", "template", "this", "throw", "try", "typeid", "typename", "using",
    "virtual", "wchar_t", "xor", "xor_eq",
];

/// Typedefs and macros the header depends on or defines itself.
const RESERVED_NAMES: &[&str] = &[
    "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t",
    "uint64_t", "intptr_t", "uintptr_t", "size_t", "ptrdiff_t", "NULL", RUST_BUFFER,
    FOREIGN_BYTES, RUST_CALL_STATUS, "RUST_CALL_SUCCESS", "RUST_CALL_ERROR",
    "RUST_CALL_UNEXPECTED_ERROR", "RUST_CALL_CANCELLED",
];

/// Names from `<stddef.h>` and `<stdint.h>` outside the `int*_t`/`INT*_MAX`
/// families.
const STANDARD_NAMES: &[&str] = &[
    "offsetof", "max_align_t", "nullptr_t", "unreachable", "wchar_t", "SIZE_MAX",
    "SIZE_WIDTH", "PTRDIFF_MIN", "PTRDIFF_MAX", "PTRDIFF_WIDTH", "SIG_ATOMIC_MIN",
    "SIG_ATOMIC_MAX", "SIG_ATOMIC_WIDTH", "WCHAR_MIN", "WCHAR_MAX", "WCHAR_WIDTH",
    "WINT_MIN", "WINT_MAX", "WINT_WIDTH",
];

/// Whether `name` is a C or C++ keyword.
pub fn is_keyword(name: &str) -> bool {
    C_KEYWORDS.contains(&name) || CPP_KEYWORDS.contains(&name)
}

/// Names every generated header declares itself.
pub fn builtin_names() -> &'static [&'static str] {
    RESERVED_NAMES
}

/// Whether `name` is declared by the standard headers the output includes,
/// or reserved for them.
///
/// `<stdint.h>` reserves typedefs starting with `int`/`uint` and ending in
/// `_t`, and macros starting with `INT`/`UINT` and ending in `_MAX`, `_MIN`,
/// `_WIDTH` or `_C`.
pub fn is_standard_name(name: &str) -> bool {
    if STANDARD_NAMES.contains(&name) {
        return true;
    }
    if (name.starts_with("int") || name.starts_with("uint")) && name.ends_with("_t") {
        return true;
    }
    (name.starts_with("INT") || name.starts_with("UINT"))
        && ["_MAX", "_MIN", "_WIDTH", "_C"]
            .iter()
            .any(|suffix| name.ends_with(suffix))
}

/// Whether `name` is one of the include guards of the shared runtime blocks.
pub fn is_runtime_guard(name: &str) -> bool {
    AbiVersion::ALL
        .iter()
        .any(|abi| name == abi.buffer_guard() || name == abi.call_status_guard())
}

fn syntax_problem(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("empty name"),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Some("must start with a letter or underscore")
        }
        _ => {}
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("may only contain ASCII letters, digits, and underscores");
    }
    None
}

fn is_implementation_reserved(name: &str) -> bool {
    let bytes = name.as_bytes();
    name.starts_with("__")
        || (bytes.first() == Some(&b'_') && bytes.get(1).is_some_and(u8::is_ascii_uppercase))
}

/// Validate a name that becomes a file-scope C identifier.
pub fn check_global(name: &str, context: &str) -> Result<()> {
    if let Some(reason) = syntax_problem(name) {
        return Err(HeaderError::invalid_identifier(name, context, reason));
    }
    if is_keyword(name) {
        return Err(HeaderError::invalid_identifier(name, context, "is a C or C++ keyword"));
    }
    if is_implementation_reserved(name) {
        return Err(HeaderError::invalid_identifier(
            name,
            context,
            "is reserved for the implementation",
        ));
    }
    if RESERVED_NAMES.contains(&name) || is_standard_name(name) || is_runtime_guard(name) {
        return Err(HeaderError::invalid_identifier(
            name,
            context,
            "shadows a standard or generated declaration",
        ));
    }
    Ok(())
}

/// Rename a field or parameter so it is a usable C identifier.
///
/// Keywords, the status out-parameter, standard and generated names, and
/// any name in `type_names` get trailing `_` until none of these match.
/// A local spelled like a type would hide that type for the rest of the
/// prototype (or, in C++, the rest of the struct).
pub fn sanitize_local(
    name: &str,
    context: &str,
    type_names: &BTreeSet<String>,
) -> Result<String> {
    if let Some(reason) = syntax_problem(name) {
        return Err(HeaderError::invalid_identifier(name, context, reason));
    }
    let mut clean = name.to_string();
    while shadows(&clean, type_names) {
        clean.push('_');
    }
    Ok(clean)
}

fn shadows(name: &str, type_names: &BTreeSet<String>) -> bool {
    is_keyword(name)
        || name == STATUS_PARAM
        || RESERVED_NAMES.contains(&name)
        || is_standard_name(name)
        || is_runtime_guard(name)
        || type_names.contains(name)
}

/// Sanitize a list of locals, rejecting names that collide after renaming.
pub fn sanitize_locals<'a>(
    names: impl IntoIterator<Item = &'a str>,
    owner: &str,
    type_names: &BTreeSet<String>,
) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let context = format!("'{name}' in {owner}");
        let clean = sanitize_local(name, &context, type_names)?;
        if out.contains(&clean) {
            return Err(HeaderError::invalid_identifier(
                name,
                context,
                format!("collides with '{clean}' after sanitizing"),
            ));
        }
        out.push(clean);
    }
    Ok(out)
}

/// `imageTools` -> `IMAGE_TOOLS`, `HTTPServer` -> `HTTP_SERVER`.
pub fn screaming_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c == ' ' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

/// `image_tools` -> `ImageTools`.
pub fn upper_camel(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
