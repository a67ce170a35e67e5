//! `hbind.toml` project manifest: generator defaults for a source tree.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use hbind_c::{AbiVersion, GeneratorOptions, GuardStyle};
use serde::{Deserialize, Serialize};

/// The manifest file name searched for from the working directory upward.
pub const MANIFEST_NAME: &str = "hbind.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HbindManifest {
    /// Generator defaults.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// The `[generator]` section. Every key is optional; command-line flags
/// take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// ABI version (`1`, `v1`, `2`, `v2`).
    #[serde(default)]
    pub abi: Option<String>,
    /// Include-guard style (`ifndef`, `pragma-once`).
    #[serde(default)]
    pub guard: Option<String>,
    /// Output directory, relative to the manifest.
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub emit_checksums: Option<bool>,
    #[serde(default)]
    pub emit_docs: Option<bool>,
}

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub abi: Option<String>,
    pub guard: Option<String>,
    pub out_dir: Option<PathBuf>,
}

impl HbindManifest {
    /// Search upward from `start_dir` for an `hbind.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: HbindManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                tracing::debug!(path = %candidate.display(), "loaded manifest");
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing hbind.toml")
    }

    /// Merge manifest defaults with command-line overrides.
    ///
    /// Returns the generator options and the output directory. Without any
    /// configured directory, headers go to `cwd`.
    pub fn resolve(
        manifest: Option<(&HbindManifest, &Path)>,
        overrides: &Overrides,
        cwd: &Path,
    ) -> Result<(GeneratorOptions, PathBuf)> {
        let config = manifest.map(|(m, _)| &m.generator);
        let mut options = GeneratorOptions::default();

        let abi = overrides
            .abi
            .as_deref()
            .or_else(|| config.and_then(|c| c.abi.as_deref()));
        if let Some(abi) = abi {
            options.abi = AbiVersion::parse(abi)
                .ok_or_else(|| anyhow!("unknown ABI version '{abi}' (expected 1 or 2)"))?;
        }

        let guard = overrides
            .guard
            .as_deref()
            .or_else(|| config.and_then(|c| c.guard.as_deref()));
        if let Some(guard) = guard {
            options.guard = GuardStyle::parse(guard).ok_or_else(|| {
                anyhow!("unknown guard style '{guard}' (expected ifndef or pragma-once)")
            })?;
        }

        if let Some(config) = config {
            options.emit_checksums = config.emit_checksums.unwrap_or(options.emit_checksums);
            options.emit_docs = config.emit_docs.unwrap_or(options.emit_docs);
        }

        let out_dir = match (&overrides.out_dir, manifest) {
            (Some(dir), _) => cwd.join(dir),
            (None, Some((m, root))) => match &m.generator.out_dir {
                Some(dir) => root.join(dir),
                None => cwd.to_path_buf(),
            },
            (None, None) => cwd.to_path_buf(),
        };

        Ok((options, out_dir))
    }

    /// Generate the default manifest for `hbind init`.
    pub fn template() -> String {
        r#"[generator]
abi = "v2"
guard = "ifndef"
out-dir = "include"
emit-checksums = true
emit-docs = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[generator]
abi = "1"
guard = "pragma-once"
out-dir = "gen/include"
emit-checksums = false
emit-docs = false
"#;
        let manifest = HbindManifest::from_str(toml_str).unwrap();
        assert_eq!(manifest.generator.abi.as_deref(), Some("1"));
        assert_eq!(manifest.generator.out_dir.as_deref(), Some("gen/include"));
        assert_eq!(manifest.generator.emit_checksums, Some(false));
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = HbindManifest::from_str("").unwrap();
        assert!(manifest.generator.abi.is_none());
        assert!(manifest.generator.out_dir.is_none());
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(HbindManifest::from_str("this is not valid toml [[[").is_err());
    }

    #[test]
    fn template_is_valid_toml() {
        let manifest = HbindManifest::from_str(&HbindManifest::template()).unwrap();
        assert_eq!(manifest.generator.abi.as_deref(), Some("v2"));
        assert_eq!(manifest.generator.out_dir.as_deref(), Some("include"));
    }

    #[test]
    fn resolve_uses_manifest_defaults() {
        let manifest = HbindManifest::from_str(
            "[generator]\nabi = \"v1\"\nguard = \"pragma-once\"\n\
             out-dir = \"include\"\nemit-docs = false\n",
        )
        .unwrap();
        let root = Path::new("/project");
        let (options, out_dir) = HbindManifest::resolve(
            Some((&manifest, root)),
            &Overrides::default(),
            Path::new("/project/src"),
        )
        .unwrap();
        assert_eq!(options.abi, AbiVersion::V1);
        assert_eq!(options.guard, GuardStyle::PragmaOnce);
        assert!(!options.emit_docs);
        assert!(options.emit_checksums);
        assert_eq!(out_dir, Path::new("/project/include"));
    }

    #[test]
    fn flags_override_manifest() {
        let manifest =
            HbindManifest::from_str("[generator]\nabi = \"v1\"\nout-dir = \"include\"\n")
                .unwrap();
        let overrides = Overrides {
            abi: Some("2".to_string()),
            guard: None,
            out_dir: Some(PathBuf::from("out")),
        };
        let (options, out_dir) = HbindManifest::resolve(
            Some((&manifest, Path::new("/project"))),
            &overrides,
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(options.abi, AbiVersion::V2);
        assert_eq!(out_dir, Path::new("/work/out"));
    }

    #[test]
    fn resolve_without_manifest() {
        let (options, out_dir) =
            HbindManifest::resolve(None, &Overrides::default(), Path::new("/work")).unwrap();
        assert_eq!(options, GeneratorOptions::default());
        assert_eq!(out_dir, Path::new("/work"));
    }

    #[test]
    fn unknown_values_rejected() {
        let overrides = Overrides {
            abi: Some("7".to_string()),
            ..Default::default()
        };
        let err = HbindManifest::resolve(None, &overrides, Path::new("/work")).unwrap_err();
        assert!(err.to_string().contains("unknown ABI version '7'"));

        let overrides = Overrides {
            guard: Some("none".to_string()),
            ..Default::default()
        };
        assert!(HbindManifest::resolve(None, &overrides, Path::new("/work")).is_err());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), "[generator]\nabi = \"1\"\n").unwrap();

        let nested = dir.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = HbindManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.generator.abi.as_deref(), Some("1"));
        assert_eq!(found_dir, dir.path());
    }
}
