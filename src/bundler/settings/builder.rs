//! Builder for constructing Settings.

use super::{PlaceholderEnvironment, Settings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// All three fields are required; paths should already be absolute.
#[derive(Default)]
pub struct SettingsBuilder {
    package_directory: Option<PathBuf>,
    placeholders: Option<PlaceholderEnvironment>,
    platform: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the directory where staging trees and archives are written.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.package_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the resolved placeholder values.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn placeholders(mut self, placeholders: PlaceholderEnvironment) -> Self {
        self.placeholders = Some(placeholders);
        self
    }

    /// Sets the detected platform tag.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the package
    /// directory is relative.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let package_directory = self
            .package_directory
            .context("package_directory is required")?;
        if !package_directory.is_absolute() {
            crate::bail!(
                "package_directory must be absolute, got {}",
                package_directory.display()
            );
        }

        Ok(Settings::new(
            package_directory,
            self.placeholders.context("placeholders are required")?,
            self.platform.context("platform is required")?,
        ))
    }
}
