//! Update phase: clone missing modules, pull and switch existing ones.

use crate::bundler::utils::fs::remove_dir_best_effort;
use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::manifest::{ModuleSpec, ReleaseManifest};
use crate::source::{Git, github_url};

/// Updates every module in the manifest.
pub async fn update_modules(
    manifest: &ReleaseManifest,
    runtime: &RuntimeConfig,
    git: &Git,
) -> Result<()> {
    runtime.section("Updating code from GIT")?;
    for module in &manifest.modules {
        update_module(module, &manifest.github_org, runtime, git).await?;
    }
    Ok(())
}

/// Clones a module, or pulls it and checks out its pinned revision.
pub async fn update_module(
    module: &ModuleSpec,
    org: &str,
    runtime: &RuntimeConfig,
    git: &Git,
) -> Result<()> {
    let dir = runtime.build_dir().join(&module.name);
    if !dir.exists() {
        return clone_module(module, org, runtime, git).await;
    }

    runtime.progress(&format!("\nUpdating {}", module.name))?;
    runtime.check(
        git.pull(&dir).await,
        &format!("Failed to update {}/{}", org, module.name),
    )?;
    runtime.check(
        git.checkout(&dir, module.revision()).await,
        &format!("Failed to switch tags in {}/{}", org, module.name),
    )
}

/// Fresh clone of a module, replacing any stale directory.
pub async fn clone_module(
    module: &ModuleSpec,
    org: &str,
    runtime: &RuntimeConfig,
    git: &Git,
) -> Result<()> {
    runtime.progress(&format!("\nCloning {}", module.name))?;
    let dir = runtime.build_dir().join(&module.name);
    remove_dir_best_effort(&dir).await;

    let url = github_url(org, &module.name);
    runtime.check(
        git.clone_into(&url, &dir).await,
        &format!("Failed to clone {}/{}", org, module.name),
    )?;

    if let Some(tag) = &module.tag {
        if dir.exists() {
            runtime.check(
                git.checkout(&dir, tag).await,
                &format!("Failed to switch tags in {}/{}", org, module.name),
            )?;
        }
    }
    Ok(())
}
