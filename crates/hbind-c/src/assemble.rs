//! Header assembly.
//!
//! The assembler orders fragments by key and joins them. It knows nothing
//! about the types the fragments declare.

use crate::context::GenerationContext;
use crate::fragment::{Fragment, Section};
use crate::options::GuardStyle;
use crate::render::doc_comment;

/// Fragments that frame the header: banner, guard, includes, and the
/// C++ linkage block.
pub fn frame(ctx: &GenerationContext<'_>) -> Vec<Fragment> {
    let model = ctx.model();
    let mut banner = format!(
        "Generated by hbind {}. Do not edit.\n\n\
         Namespace: {}\nABI version: {}\nInterface fingerprint: {}",
        env!("CARGO_PKG_VERSION"),
        model.namespace(),
        ctx.abi().number(),
        model.fingerprint(),
    );
    if ctx.options().emit_docs {
        if let Some(docs) = &model.library.docs {
            banner.push_str("\n\n");
            banner.push_str(docs.trim());
        }
    }
    let banner = doc_comment(&banner, "").replacen("/**", "/*", 1);

    let guard = ctx.guard_macro();
    let (open, close) = match ctx.options().guard {
        GuardStyle::Ifndef => (
            format!("#ifndef {guard}\n#define {guard}"),
            format!("#endif /* {guard} */"),
        ),
        GuardStyle::PragmaOnce => ("#pragma once".to_string(), String::new()),
    };

    vec![
        Fragment::new(Section::Banner, 0, banner.trim_end()),
        Fragment::new(Section::GuardOpen, 0, open),
        Fragment::new(
            Section::Includes,
            0,
            "#include <stdbool.h>\n#include <stddef.h>\n#include <stdint.h>",
        ),
        Fragment::new(Section::CppOpen, 0, "#ifdef __cplusplus\nextern \"C\" {\n#endif"),
        Fragment::new(Section::CppClose, 0, "#ifdef __cplusplus\n} /* extern \"C\" */\n#endif"),
        Fragment::new(Section::GuardClose, 0, close),
    ]
}

/// Join fragments into one header text.
///
/// Fragments are stable-sorted by key, empty fragments are dropped, and
/// the result ends with a single newline.
pub fn assemble(mut fragments: Vec<Fragment>) -> String {
    fragments.sort_by_key(|f| f.key);
    let mut out = fragments
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| f.text.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}
