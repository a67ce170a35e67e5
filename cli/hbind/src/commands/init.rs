//! `hbind init`: starter interface scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::manifest::{HbindManifest, MANIFEST_NAME};

/// Create a starter interface for `namespace` in the current directory.
pub fn run(namespace: &str) -> Result<()> {
    let cwd = std::env::current_dir()?;
    create_interface(&cwd, namespace)?;
    Ok(())
}

/// Starter interface file contents.
pub fn interface_template(namespace: &str) -> String {
    format!(
        r#"[library]
namespace = "{namespace}"
symbol-prefix = "{namespace}_"
docs = "The {namespace} library."

[[records]]
name = "Point"
fields = [{{ name = "x", type = "i32" }}, {{ name = "y", type = "i32" }}]

[[functions]]
name = "distance"
params = [{{ name = "a", type = "Point" }}, {{ name = "b", type = "Point" }}]
returns = "f64"
docs = "Euclidean distance between two points."
"#
    )
}

/// Write `<namespace>.hbind.toml` into `dir`, plus an `hbind.toml` if the
/// directory has none. Returns the interface file path.
pub(crate) fn create_interface(dir: &Path, namespace: &str) -> Result<PathBuf> {
    hbind_c::ident::check_global(namespace, "library namespace")
        .with_context(|| format!("'{namespace}' cannot be used as a namespace"))?;

    let interface = dir.join(format!("{namespace}.hbind.toml"));
    if interface.exists() {
        bail!("'{}' already exists", interface.display());
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&interface, interface_template(namespace))
        .with_context(|| format!("writing {}", interface.display()))?;
    println!("Created {}", interface.display());

    let manifest = dir.join(MANIFEST_NAME);
    if !manifest.exists() {
        fs::write(&manifest, HbindManifest::template())
            .with_context(|| format!("writing {}", manifest.display()))?;
        println!("Created {}", manifest.display());
    }

    Ok(interface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_interface_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_interface(dir.path(), "geometry").unwrap();
        assert_eq!(path, dir.path().join("geometry.hbind.toml"));
        assert!(path.is_file());
        assert!(dir.path().join("hbind.toml").is_file());
    }

    #[test]
    fn init_generates_loadable_interface() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_interface(dir.path(), "geometry").unwrap();
        let model = hbind_model::load_model(&path).unwrap();
        assert_eq!(model.namespace(), "geometry");
        assert_eq!(model.library.symbol_prefix, "geometry_");
        assert_eq!(model.functions[0].name, "distance");
    }

    #[test]
    fn init_keeps_existing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hbind.toml"), "[generator]\nabi = \"1\"\n").unwrap();
        create_interface(dir.path(), "geometry").unwrap();
        let content = fs::read_to_string(dir.path().join("hbind.toml")).unwrap();
        assert!(content.contains("abi = \"1\""));
    }

    #[test]
    fn init_refuses_existing_interface() {
        let dir = tempfile::tempdir().unwrap();
        create_interface(dir.path(), "geometry").unwrap();
        let err = create_interface(dir.path(), "geometry").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn init_rejects_invalid_namespace() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create_interface(dir.path(), "not-valid").is_err());
        assert!(create_interface(dir.path(), "struct").is_err());
    }
}
