//! `${TOKEN}` substitution in bundle source roots.

use crate::bundler::error::{Error, Result};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Build tree holding one checkout per module.
pub const BUILD_DIR: &str = "BUILDDIR";
/// Development install tree the module builds install into.
pub const DEV_INSTALL_DIR: &str = "FSLDEVDIR";
/// Base install tree of the host toolkit.
pub const BASE_INSTALL_DIR: &str = "FSLDIR";
/// Marker root whose items are Python module names rather than paths.
pub const PYTHON_MODULES: &str = "PYTHON";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap_or_else(|e| unreachable!("{e}"))
});

/// Token names appearing in `template`, in order, duplicates included.
pub fn tokens(template: &str) -> impl Iterator<Item = &str> {
    TOKEN_RE
        .captures_iter(template)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// Whether `token` names a path placeholder this environment can resolve.
pub fn is_path_token(token: &str) -> bool {
    matches!(token, BUILD_DIR | DEV_INSTALL_DIR | BASE_INSTALL_DIR)
}

/// Resolved values for the path placeholders of one invocation.
#[derive(Clone, Debug)]
pub struct PlaceholderEnvironment {
    build_dir: PathBuf,
    dev_install_dir: PathBuf,
    base_install_dir: Option<PathBuf>,
    allow_passthrough: bool,
}

impl PlaceholderEnvironment {
    /// Creates an environment from absolute roots.
    pub fn new(
        build_dir: impl Into<PathBuf>,
        dev_install_dir: impl Into<PathBuf>,
        base_install_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            build_dir: build_dir.into(),
            dev_install_dir: dev_install_dir.into(),
            base_install_dir,
            allow_passthrough: false,
        }
    }

    /// Leave unknown `${...}` tokens verbatim instead of failing.
    pub fn allow_passthrough(mut self, allow: bool) -> Self {
        self.allow_passthrough = allow;
        self
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn dev_install_dir(&self) -> &Path {
        &self.dev_install_dir
    }

    pub fn base_install_dir(&self) -> Option<&Path> {
        self.base_install_dir.as_deref()
    }

    fn value(&self, token: &str) -> Option<Option<&Path>> {
        match token {
            BUILD_DIR => Some(Some(&self.build_dir)),
            DEV_INSTALL_DIR => Some(Some(&self.dev_install_dir)),
            BASE_INSTALL_DIR => Some(self.base_install_dir.as_deref()),
            _ => None,
        }
    }

    /// Replaces every known placeholder in `template` with its path.
    ///
    /// Each token is resolved independently and may occur any number of times.
    /// Unknown tokens fail with [`Error::UnknownPlaceholder`] unless passthrough
    /// is enabled, in which case they are kept as written.
    pub fn resolve(&self, template: &str) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut last = 0;

        for caps in TOKEN_RE.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&template[last..whole.start()]);
            last = whole.end();

            match self.value(name.as_str()) {
                Some(Some(path)) => out.push_str(&path.to_string_lossy()),
                Some(None) => {
                    return Err(Error::UnresolvedPlaceholder {
                        token: name.as_str().to_string(),
                        template: template.to_string(),
                    });
                }
                None if self.allow_passthrough => {
                    log::warn!(
                        "Unknown placeholder {} in '{}' left as written",
                        whole.as_str(),
                        template
                    );
                    out.push_str(whole.as_str());
                }
                None => {
                    return Err(Error::UnknownPlaceholder {
                        token: name.as_str().to_string(),
                        template: template.to_string(),
                    });
                }
            }
        }

        out.push_str(&template[last..]);
        Ok(out)
    }
}
