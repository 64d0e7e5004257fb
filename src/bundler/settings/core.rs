//! Core Settings struct and implementations.

use super::PlaceholderEnvironment;
use std::path::{Path, PathBuf};

/// Settings shared by every bundle assembled in one run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use qubic_build::bundler::{PlaceholderEnvironment, SettingsBuilder};
///
/// # fn example() -> qubic_build::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package_directory("/work/packages")
///     .placeholders(PlaceholderEnvironment::new(
///         "/work/build",
///         "/work/install/fsldev",
///         None,
///     ))
///     .platform("ubuntu18")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory receiving staging trees and archives.
    package_directory: PathBuf,

    /// Values substituted into source roots.
    placeholders: PlaceholderEnvironment,

    /// Detected platform tag, used unless a bundle overrides it.
    platform: String,
}

impl Settings {
    /// Returns the package output directory.
    pub fn package_directory(&self) -> &Path {
        &self.package_directory
    }

    /// Returns the placeholder environment.
    pub fn placeholders(&self) -> &PlaceholderEnvironment {
        &self.placeholders
    }

    /// Returns the build root holding module checkouts.
    pub fn build_directory(&self) -> &Path {
        self.placeholders.build_dir()
    }

    /// Returns the detected platform tag.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Staging directory for the bundle named `name`.
    pub fn staging_directory(&self, name: &str) -> PathBuf {
        self.package_directory.join(name)
    }

    /// Archive path for a bundle: `<name>-<version>-<platform>.tar.gz`.
    pub fn archive_path(&self, name: &str, version: &str, platform: &str) -> PathBuf {
        self.package_directory
            .join(format!("{name}-{version}-{platform}.tar.gz"))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package_directory: PathBuf,
        placeholders: PlaceholderEnvironment,
        platform: String,
    ) -> Self {
        Self {
            package_directory,
            placeholders,
            platform,
        }
    }
}
