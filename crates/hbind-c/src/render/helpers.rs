//! Call-status declarations shared by every fallible function.

use crate::abi::{AbiVersion, RUST_BUFFER, RUST_CALL_STATUS};
use crate::fragment::{Fragment, Section};

/// Render `RustCallStatus` and its code macros.
pub fn render(abi: AbiVersion) -> Fragment {
    let guard = abi.call_status_guard();
    let codes: String = abi
        .call_status_codes()
        .iter()
        .map(|(name, value)| format!("#define {name} {value}\n"))
        .collect();

    let text = format!(
        "#ifndef {guard}
#define {guard}

{codes}
/**
 * Outcome of a call, written by the library.
 *
 * Initialize `code` to RUST_CALL_SUCCESS before the call. On
 * RUST_CALL_ERROR `error_buf` holds a serialized error the caller must free.
 */
typedef struct {RUST_CALL_STATUS} {{
    int8_t code;
    {RUST_BUFFER} error_buf;
}} {RUST_CALL_STATUS};

#endif /* {guard} */"
    );
    Fragment::new(Section::Helpers, 0, text)
}
