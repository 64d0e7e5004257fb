//! Bundle phase: assemble release archives from the built modules.

use crate::bundler::{
    Assembler, BundleDefinition, BundledArtifact, PlaceholderEnvironment, PythonLocator,
    SettingsBuilder, TarGzArchiver, settings::detect_platform,
};
use crate::cli::RuntimeConfig;
use crate::error::{BuildError, CliError, Result};
use crate::source::Git;

/// Assembles `bundles` in order.
///
/// Without continue-on-error the first failing bundle aborts the run. With it,
/// every bundle is attempted and the run fails at the end if any bundle did
/// not produce an archive.
pub async fn build_bundles(
    bundles: &[&BundleDefinition],
    runtime: &RuntimeConfig,
    allow_passthrough: bool,
    git: Git,
) -> Result<Vec<BundledArtifact>> {
    runtime.section("Creating bundle packages")?;

    // Bundles with a fixed platform tag do not need host detection.
    let platform = if bundles.iter().all(|b| b.platform_override().is_some()) {
        String::new()
    } else {
        detect_platform(runtime.root()).await?
    };

    let placeholders = PlaceholderEnvironment::new(
        runtime.build_dir(),
        runtime.dev_install_dir(),
        runtime.base_install_dir().map(Into::into),
    )
    .allow_passthrough(allow_passthrough);

    let settings = SettingsBuilder::new()
        .package_directory(runtime.package_dir())
        .placeholders(placeholders)
        .platform(platform)
        .build()?;

    let locator = PythonLocator::new(runtime.python(), runtime.root());
    let assembler = Assembler::with_collaborators(settings, git, locator, TarGzArchiver);

    let mut artifacts = Vec::new();
    let mut failed = Vec::new();
    for bundle in bundles {
        match assembler.assemble(bundle).await {
            Ok(artifact) => {
                runtime.success(&format!(
                    "✓ {} ({} items) -> {}",
                    artifact.name,
                    artifact.staged,
                    artifact.archive.display()
                ))?;
                artifacts.push(artifact);
            }
            Err(e) => {
                runtime.check(
                    Err(e),
                    &format!("Failed to create bundle {}", bundle.name()),
                )?;
                failed.push(bundle.name().to_string());
            }
        }
    }

    if !failed.is_empty() {
        return Err(BuildError::Cli(CliError::BundlesFailed {
            count: failed.len(),
            names: failed.join(", "),
        }));
    }
    Ok(artifacts)
}
