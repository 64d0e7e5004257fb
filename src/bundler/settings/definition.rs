//! Bundle definitions: what goes into each release archive.

use super::placeholders::{self, PYTHON_MODULES};
use crate::bundler::error::{Error, Result};
use std::collections::HashSet;

/// A single path component: no separators, not `.` or `..`.
fn is_plain_dir_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Where the items of a [`SourceRule`] are taken from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(from = "String")]
pub enum SourceRoot {
    /// Path template, possibly containing `${TOKEN}` placeholders.
    Path(String),
    /// `${PYTHON}`: items are Python module names located by the interpreter.
    PythonModules,
}

impl From<String> for SourceRoot {
    fn from(template: String) -> Self {
        if template == format!("${{{PYTHON_MODULES}}}") {
            SourceRoot::PythonModules
        } else {
            SourceRoot::Path(template)
        }
    }
}

impl From<&str> for SourceRoot {
    fn from(template: &str) -> Self {
        template.to_string().into()
    }
}

impl std::fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceRoot::Path(template) => f.write_str(template),
            SourceRoot::PythonModules => write!(f, "${{{PYTHON_MODULES}}}"),
        }
    }
}

/// One source root and the items staged from it.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceRule {
    /// Root the items are relative to.
    pub root: SourceRoot,
    /// Relative paths, optionally ending in a glob segment, or module names.
    #[serde(default)]
    pub items: Vec<String>,
}

/// A named release target.
///
/// # Configuration
///
/// ```toml
/// [[bundle]]
/// name = "fabber"
/// version_source = "fabber_core"
///
/// [[bundle.source]]
/// root = "${BUILDDIR}/fabber_core"
/// items = ["README.md", "LICENSE"]
///
/// [[bundle.source]]
/// root = "${FSLDEVDIR}"
/// items = ["bin/fabber*", "lib/*fabber*", "include/fabber_core"]
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleDefinition {
    name: String,

    #[serde(default, rename = "source")]
    sources: Vec<SourceRule>,

    /// Build-tree directory whose version tag names the archive.
    #[serde(default)]
    version_source: Option<String>,

    /// Platform tag used instead of the detected one.
    #[serde(default)]
    platform: Option<String>,
}

impl BundleDefinition {
    /// Creates an empty definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            version_source: None,
            platform: None,
        }
    }

    /// Appends a source rule.
    pub fn source<I, S>(mut self, root: impl Into<SourceRoot>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.push(SourceRule {
            root: root.into(),
            items: items.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Sets the directory queried for the release version.
    pub fn version_source(mut self, module: impl Into<String>) -> Self {
        self.version_source = Some(module.into());
        self
    }

    /// Sets a fixed platform tag.
    pub fn platform(mut self, tag: impl Into<String>) -> Self {
        self.platform = Some(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[SourceRule] {
        &self.sources
    }

    /// Directory name under the build root that carries the version tag.
    pub fn version_module(&self) -> &str {
        self.version_source.as_deref().unwrap_or(&self.name)
    }

    pub fn platform_override(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Checks the structural rules of a single definition.
    pub fn validate(&self, allow_passthrough: bool) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Manifest("bundle name must not be empty".into()));
        }
        if !is_plain_dir_name(&self.name) {
            return Err(Error::Manifest(format!(
                "bundle name '{}' must be a plain directory name",
                self.name
            )));
        }
        if let Some(module) = &self.version_source {
            if module.trim().is_empty() {
                return Err(Error::Manifest(format!(
                    "bundle '{}' has an empty version_source",
                    self.name
                )));
            }
            if !is_plain_dir_name(module) {
                return Err(Error::Manifest(format!(
                    "bundle '{}': version_source '{}' must be a plain directory name",
                    self.name, module
                )));
            }
        }
        if let Some(platform) = &self.platform {
            if platform.trim().is_empty() {
                return Err(Error::Manifest(format!(
                    "bundle '{}' has an empty platform",
                    self.name
                )));
            }
        }

        for rule in &self.sources {
            match &rule.root {
                SourceRoot::PythonModules => {
                    for item in &rule.items {
                        self.check_module_name(item)?;
                    }
                }
                SourceRoot::Path(template) => {
                    self.check_root(template, allow_passthrough)?;
                    for item in &rule.items {
                        self.check_item(item)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_root(&self, template: &str, allow_passthrough: bool) -> Result<()> {
        if template.trim().is_empty() {
            return Err(Error::Manifest(format!(
                "bundle '{}' has a source with an empty root",
                self.name
            )));
        }
        for token in placeholders::tokens(template) {
            if token == PYTHON_MODULES {
                return Err(Error::Manifest(format!(
                    "bundle '{}': ${{{PYTHON_MODULES}}} must be used on its own, not in '{}'",
                    self.name, template
                )));
            }
            if !placeholders::is_path_token(token) && !allow_passthrough {
                return Err(Error::UnknownPlaceholder {
                    token: token.to_string(),
                    template: template.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_item(&self, item: &str) -> Result<()> {
        let reject = |reason: &str| {
            Err(Error::InvalidItemPattern {
                bundle: self.name.clone(),
                pattern: item.to_string(),
                reason: reason.to_string(),
            })
        };

        if item.is_empty() {
            return reject("empty pattern");
        }
        if item.starts_with(['/', '\\']) || std::path::Path::new(item).is_absolute() {
            return reject("must be a relative path");
        }
        if item.contains("**") {
            return reject("recursive '**' globs are not supported");
        }

        let segments: Vec<&str> = item.split(['/', '\\']).collect();
        if segments.iter().any(|s| *s == "..") {
            return reject("must not leave the source root");
        }
        if segments.last().is_some_and(|s| s.is_empty()) {
            return reject("must name a file or directory, not end in a separator");
        }
        let is_glob = |s: &str| s.contains(['*', '?', '[']);
        if segments[..segments.len() - 1].iter().any(|s| is_glob(s)) {
            return reject("only the final path segment may contain a glob");
        }
        Ok(())
    }

    fn check_module_name(&self, name: &str) -> Result<()> {
        let valid = !name.is_empty()
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidItemPattern {
                bundle: self.name.clone(),
                pattern: name.to_string(),
                reason: "not a top-level Python module name".to_string(),
            })
        }
    }
}

/// Validates every definition and that names are unique across the table.
pub fn validate_table(bundles: &[BundleDefinition], allow_passthrough: bool) -> Result<()> {
    let mut seen = HashSet::new();
    for bundle in bundles {
        bundle.validate(allow_passthrough)?;
        if !seen.insert(bundle.name()) {
            return Err(Error::Manifest(format!(
                "bundle '{}' is defined more than once",
                bundle.name()
            )));
        }
    }
    Ok(())
}
