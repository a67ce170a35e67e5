//! Runtime buffer declarations.
//!
//! Constant per ABI version and independent of the interface, so any number
//! of generated headers can share one translation unit.

use crate::abi::{AbiVersion, FOREIGN_BYTES, RUST_BUFFER};
use crate::ctype::CType;
use crate::fragment::{Fragment, Section};

/// Render the `RustBuffer` and `ForeignBytes` declarations.
pub fn render(abi: AbiVersion) -> Fragment {
    let guard = abi.buffer_guard();
    let len = abi.buffer_length_type();
    let foreign_len = abi.foreign_length_type();
    let data = CType::pointer(CType::UInt8);
    let borrowed = CType::pointer(CType::constant(CType::UInt8));

    let text = format!(
        "#ifndef {guard}
#define {guard}

/**
 * A byte buffer allocated by the library.
 *
 * The caller owns `data` until the buffer is passed back to the library or
 * released through the library's rustbuffer_free function.
 */
typedef struct {RUST_BUFFER} {{
    {};
    {};
    {};
}} {RUST_BUFFER};

/** Bytes borrowed from the caller for the duration of one call. */
typedef struct {FOREIGN_BYTES} {{
    {};
    {};
}} {FOREIGN_BYTES};

#endif /* {guard} */",
        len.declare("capacity"),
        len.declare("len"),
        data.declare("data"),
        foreign_len.declare("len"),
        borrowed.declare("data"),
    );
    Fragment::new(Section::RuntimeBuffer, 0, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_uses_unsigned_64_bit_lengths() {
        let frag = render(AbiVersion::V2);
        let layout = "    uint64_t capacity;\n    uint64_t len;\n    uint8_t *data;";
        assert!(frag.text.contains(layout));
        assert!(frag.text.contains("    int32_t len;\n    const uint8_t *data;"));
        assert!(frag
            .text
            .starts_with("#ifndef HBIND_SHARED_ABI_V2_H\n#define HBIND_SHARED_ABI_V2_H"));
        assert!(frag.text.ends_with("#endif /* HBIND_SHARED_ABI_V2_H */"));
    }

    #[test]
    fn v1_uses_signed_32_bit_lengths() {
        let frag = render(AbiVersion::V1);
        assert!(frag.text.contains("    int32_t capacity;\n    int32_t len;"));
        assert!(frag.text.contains("HBIND_SHARED_ABI_V1_H"));
    }

    #[test]
    fn constant_per_version() {
        assert_eq!(render(AbiVersion::V2), render(AbiVersion::V2));
        assert_ne!(render(AbiVersion::V1), render(AbiVersion::V2));
    }
}
