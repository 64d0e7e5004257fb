//! Main bundle assembly orchestration.
//!
//! This module provides the [`Assembler`] that turns one
//! [`BundleDefinition`] into a staging tree and a tagged archive.

use super::{
    archive::{Archiver, TarGzArchiver},
    locator::{ModuleLocator, PythonLocator},
    matcher::{stage_items, stage_modules},
    staging::reset_staging,
    version::{VersionControl, resolve_version},
};
use crate::bundler::{
    Result,
    settings::{BundleDefinition, Settings, SourceRoot},
};
use std::path::PathBuf;

/// What one successful assembly produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Bundle name.
    pub name: String,
    /// Normalized release version.
    pub version: String,
    /// Platform tag in the archive name.
    pub platform: String,
    /// Staging directory, left on disk.
    pub staging: PathBuf,
    /// Written `.tar.gz`.
    pub archive: PathBuf,
    /// Number of top-level matches copied into the staging tree.
    pub staged: usize,
}

/// Bundle assembler.
///
/// Runs `reset staging -> copy each source rule -> resolve version -> archive`
/// for one definition at a time. The first failing step aborts that bundle;
/// partially filled staging trees are left as they are.
///
/// # Examples
///
/// ```no_run
/// use qubic_build::bundler::{Assembler, BundleDefinition, Settings};
/// use qubic_build::source::Git;
///
/// # async fn example(settings: Settings) -> qubic_build::bundler::Result<()> {
/// let assembler = Assembler::new(settings, Git::default());
/// let bundle = BundleDefinition::new("verbena")
///     .source("${BUILDDIR}/verbena", ["CITE", "README.md", "LICENSE"])
///     .source("${FSLDEVDIR}/bin", ["verbena", "fabber_dsc", "mvntool"]);
/// let artifact = assembler.assemble(&bundle).await?;
/// println!("Created {}", artifact.archive.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Assembler<V, L = PythonLocator, A = TarGzArchiver> {
    settings: Settings,
    vcs: V,
    locator: L,
    archiver: A,
}

impl<V: VersionControl> Assembler<V> {
    /// Creates an assembler using `python` from `PATH` for module roots and
    /// the native tar.gz writer.
    pub fn new(settings: Settings, vcs: V) -> Self {
        let locator = PythonLocator::new("python", settings.package_directory());
        Self::with_collaborators(settings, vcs, locator, TarGzArchiver)
    }
}

impl<V, L, A> Assembler<V, L, A>
where
    V: VersionControl,
    L: ModuleLocator,
    A: Archiver,
{
    /// Creates an assembler with explicit collaborators.
    pub fn with_collaborators(settings: Settings, vcs: V, locator: L, archiver: A) -> Self {
        Self {
            settings,
            vcs,
            locator,
            archiver,
        }
    }

    /// Returns the assembler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Assembles one bundle and writes its archive.
    pub async fn assemble(&self, bundle: &BundleDefinition) -> Result<BundledArtifact> {
        let staging = self.settings.staging_directory(bundle.name());
        log::info!("Assembling bundle {} in {}", bundle.name(), staging.display());

        reset_staging(&staging).await?;

        let mut staged = 0;
        for rule in bundle.sources() {
            let copied = match &rule.root {
                SourceRoot::PythonModules => {
                    stage_modules(&self.locator, &rule.items, &staging).await?
                }
                SourceRoot::Path(template) => {
                    let root = PathBuf::from(self.settings.placeholders().resolve(template)?);
                    stage_items(&root, &rule.items, &staging).await?
                }
            };
            staged += copied.len();
        }
        if staged == 0 {
            log::warn!("Bundle {} matched no files", bundle.name());
        }

        let version_dir = self
            .settings
            .build_directory()
            .join(bundle.version_module());
        let version = resolve_version(&self.vcs, &version_dir).await?;

        let platform = bundle
            .platform_override()
            .unwrap_or(self.settings.platform())
            .to_string();
        let archive = self
            .settings
            .archive_path(bundle.name(), &version, &platform);

        log::info!("Writing {}", archive.display());
        self.archiver.compress(&staging, &archive).await?;

        Ok(BundledArtifact {
            name: bundle.name().to_string(),
            version,
            platform,
            staging,
            archive,
            staged,
        })
    }
}
