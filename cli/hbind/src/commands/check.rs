//! `hbind check`: validate interface files without writing headers.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hbind_c::GeneratorOptions;

/// Summary of a checked interface.
#[derive(Debug)]
pub struct CheckReport {
    pub namespace: String,
    pub fingerprint: String,
    /// Distinct functions declared in the header.
    pub functions: usize,
    pub header_bytes: usize,
}

/// Load an interface and run full generation in memory.
pub fn check_one(input: &Path, options: &GeneratorOptions) -> Result<CheckReport> {
    let model = hbind_model::load_model(input)
        .with_context(|| format!("loading {}", input.display()))?;
    let header = hbind_c::generate_header(&model, options)
        .with_context(|| format!("checking {}", input.display()))?;

    // Generation succeeded, so functions sharing a name are identical
    // redeclarations and appear once in the header.
    let functions: BTreeSet<&str> = model.functions.iter().map(|f| f.name.as_str()).collect();

    Ok(CheckReport {
        namespace: model.namespace().to_string(),
        fingerprint: model.fingerprint(),
        functions: functions.len(),
        header_bytes: header.len(),
    })
}

/// Run `hbind check` over every input, reporting each one.
pub fn run(inputs: &[PathBuf], options: &GeneratorOptions) -> Result<()> {
    if inputs.is_empty() {
        bail!("no interface files given");
    }

    let mut failures = 0usize;
    for input in inputs {
        match check_one(input, options) {
            Ok(report) => println!(
                "{}: ok (namespace {}, {} function(s), {} bytes, fingerprint {})",
                input.display(),
                report.namespace,
                report.functions,
                report.header_bytes,
                &report.fingerprint[..16.min(report.fingerprint.len())],
            ),
            Err(e) => {
                eprintln!("error: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} interface file(s) failed", inputs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clock.hbind.toml");
        std::fs::write(
            &input,
            "[library]\nnamespace = \"clock\"\n\n\
             [[functions]]\nname = \"now\"\nreturns = \"u64\"\n",
        )
        .unwrap();

        let report = check_one(&input, &GeneratorOptions::default()).unwrap();
        assert_eq!(report.namespace, "clock");
        assert_eq!(report.functions, 1);
        assert_eq!(report.fingerprint.len(), 64);
        assert!(report.header_bytes > 0);
        // Nothing written next to the input.
        assert!(!dir.path().join("clock.h").exists());
    }

    #[test]
    fn redeclarations_counted_once() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clock.hbind.toml");
        std::fs::write(
            &input,
            r#"
[library]
namespace = "clock"

[[functions]]
name = "now"
returns = "u64"

[[functions]]
name = "now"
returns = "u64"
docs = "Same prototype, declared again."

[[functions]]
name = "reset"
"#,
        )
        .unwrap();

        let report = check_one(&input, &GeneratorOptions::default()).unwrap();
        assert_eq!(report.functions, 2);
    }

    #[test]
    fn cyclic_interface_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("loops.hbind.toml");
        std::fs::write(
            &input,
            r#"
[library]
namespace = "loops"

[[records]]
name = "A"
fields = [{ name = "b", type = "B" }]

[[records]]
name = "B"
fields = [{ name = "a", type = "A" }]
"#,
        )
        .unwrap();
        let err = check_one(&input, &GeneratorOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("A -> B -> A"));
        assert!(run(&[input], &GeneratorOptions::default()).is_err());
    }
}
