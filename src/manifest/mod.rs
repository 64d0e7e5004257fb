//! Release manifest: the modules to build and the bundles to assemble.
//!
//! The manifest is TOML. A default manifest is compiled in; `--manifest`
//! replaces it with a file.

use crate::bundler::{self, BundleDefinition, settings::validate_table};
use crate::error::{BuildError, CliError, Result};
use std::{collections::HashSet, path::Path};

/// Manifest compiled into the binary.
pub const DEFAULT_MANIFEST: &str = include_str!("../../release.toml");

fn default_org() -> String {
    "ibme-qubic".to_string()
}

/// A module checked out from GitHub and built.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// Repository name, also the checkout directory under the build root.
    pub name: String,

    /// Tag or branch to check out instead of `master`.
    #[serde(default)]
    pub tag: Option<String>,
}

impl ModuleSpec {
    /// Revision the checkout is switched to after an update.
    pub fn revision(&self) -> &str {
        self.tag.as_deref().unwrap_or("master")
    }
}

/// Parsed and validated release manifest.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseManifest {
    /// GitHub organisation hosting every module.
    #[serde(default = "default_org")]
    pub github_org: String,

    /// Modules in build order.
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleSpec>,

    /// Bundle definitions in assembly order.
    #[serde(default, rename = "bundle")]
    pub bundles: Vec<BundleDefinition>,
}

impl ReleaseManifest {
    /// Parses and validates manifest text.
    pub fn parse(text: &str, allow_passthrough: bool) -> Result<Self> {
        let manifest: ReleaseManifest = toml::from_str(text)?;
        manifest.validate(allow_passthrough)?;
        Ok(manifest)
    }

    /// Checks module names and every bundle definition.
    pub fn validate(&self, allow_passthrough: bool) -> Result<()> {
        if self.github_org.trim().is_empty() {
            return Err(bundler::Error::Manifest("github_org must not be empty".into()).into());
        }

        let mut seen = HashSet::new();
        for module in &self.modules {
            let name = module.name.as_str();
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(bundler::Error::Manifest(format!(
                    "module name '{name}' must be a plain directory name"
                ))
                .into());
            }
            if !seen.insert(name) {
                return Err(bundler::Error::Manifest(format!(
                    "module '{name}' is listed more than once"
                ))
                .into());
            }
        }

        validate_table(&self.bundles, allow_passthrough)?;
        Ok(())
    }

    /// Looks up a bundle by name.
    pub fn bundle(&self, name: &str) -> Option<&BundleDefinition> {
        self.bundles.iter().find(|b| b.name() == name)
    }

    /// Bundles to assemble: all of them, or the named ones in manifest order.
    pub fn select_bundles(&self, names: &[String]) -> Result<Vec<&BundleDefinition>> {
        if names.is_empty() {
            return Ok(self.bundles.iter().collect());
        }
        if let Some(unknown) = names.iter().find(|n| self.bundle(n).is_none()) {
            let known: Vec<&str> = self.bundles.iter().map(|b| b.name()).collect();
            return Err(BuildError::Cli(CliError::InvalidArguments {
                reason: format!(
                    "Unknown bundle '{}'. Known bundles: {}",
                    unknown,
                    known.join(", ")
                ),
            }));
        }
        Ok(self
            .bundles
            .iter()
            .filter(|b| names.iter().any(|n| n == b.name()))
            .collect())
    }
}

/// Loads the manifest from `path`, or the compiled-in default.
pub fn load_manifest(path: Option<&Path>, allow_passthrough: bool) -> Result<ReleaseManifest> {
    let Some(path) = path else {
        return ReleaseManifest::parse(DEFAULT_MANIFEST, allow_passthrough);
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        BuildError::Cli(CliError::ExecutionFailed {
            command: "read_manifest".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;
    ReleaseManifest::parse(&text, allow_passthrough)
}
