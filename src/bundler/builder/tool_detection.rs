//! External tool detection and availability checking.
//!
//! Results are cached so repeated bundles do not probe `PATH` again.

use std::{path::PathBuf, sync::LazyLock};

fn find(tool: &str) -> Option<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            None
        }
    }
}

/// `lsb_release`, used for the Linux platform tag.
pub static LSB_RELEASE: LazyLock<Option<PathBuf>> = LazyLock::new(|| find("lsb_release"));

/// `git`, required for update and version resolution.
pub static GIT: LazyLock<Option<PathBuf>> = LazyLock::new(|| find("git"));

/// `make`, required for native module builds.
pub static MAKE: LazyLock<Option<PathBuf>> = LazyLock::new(|| find("make"));

/// Resolves a program name through `PATH`, falling back to the bare name so
/// the spawn error names the missing tool.
pub fn program(cached: &LazyLock<Option<PathBuf>>, name: &str) -> PathBuf {
    cached
        .as_ref()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(name))
}
