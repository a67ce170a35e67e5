//! Atomic header output.
//!
//! The header is written to a temporary file next to its destination and
//! renamed into place, so a failed or abandoned run never leaves a partial
//! header at the final path.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// What [`write_header`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced.
    Written,
    /// The file already had identical contents and was left untouched.
    Unchanged,
}

/// Write `contents` to `path` atomically.
///
/// Identical existing contents are not rewritten, so file timestamps only
/// change when the header does.
pub fn write_header(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == contents {
            tracing::debug!(path = %path.display(), "header unchanged");
            return Ok(WriteOutcome::Unchanged);
        }
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".hbind-")
        .suffix(".h.tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote header");
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("geometry.h");
        assert_eq!(write_header(&path, "int x;\n").unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "int x;\n");
    }

    #[test]
    fn identical_contents_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geometry.h");
        write_header(&path, "a\n").unwrap();
        assert_eq!(write_header(&path, "a\n").unwrap(), WriteOutcome::Unchanged);
        assert_eq!(write_header(&path, "b\n").unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "b\n");
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geometry.h");
        write_header(&path, "a\n").unwrap();
        write_header(&path, "b\n").unwrap();
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["geometry.h"]);
    }
}
