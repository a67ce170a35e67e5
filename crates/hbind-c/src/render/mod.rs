//! Fragment renderers, one per header section group.
//!
//! Renderers read a validated [`GenerationContext`](crate::context::GenerationContext)
//! and return fragments. None of them can fail.

pub mod buffer;
pub mod helpers;
pub mod loader;
pub mod types;

/// Format documentation as a C block comment at the given indent.
pub(crate) fn doc_comment(text: &str, indent: &str) -> String {
    let text = text.trim().replace("*/", "* /");
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    match lines.as_slice() {
        [] => String::new(),
        [line] => format!("{indent}/** {line} */\n"),
        _ => {
            let mut out = format!("{indent}/**\n");
            for line in lines {
                if line.is_empty() {
                    out.push_str(&format!("{indent} *\n"));
                } else {
                    out.push_str(&format!("{indent} * {line}\n"));
                }
            }
            out.push_str(&format!("{indent} */\n"));
            out
        }
    }
}

/// Doc comment for optional documentation, honoring `emit_docs`.
pub(crate) fn maybe_docs(docs: Option<&str>, emit: bool, indent: &str) -> String {
    match docs {
        Some(text) if emit => doc_comment(text, indent),
        _ => String::new(),
    }
}
