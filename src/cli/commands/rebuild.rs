//! Rebuild phase: build every module with make or setup.py.

use super::update::update_module;
use crate::build::{BuildEnvironment, BuildKind, Make, SetupPy, build_kind, machine_type};
use crate::bundler::{settings::detect_platform, utils::fs};
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::manifest::ReleaseManifest;
use crate::source::Git;
use std::path::Path;

/// Rebuilds every module in manifest order.
pub async fn rebuild_modules(
    manifest: &ReleaseManifest,
    args: &Args,
    runtime: &RuntimeConfig,
    git: &Git,
) -> Result<()> {
    runtime.section("Rebuilding code")?;

    let windows = cfg!(target_os = "windows");
    let platform = match detect_platform(runtime.root()).await {
        Ok(platform) => platform,
        Err(e) => {
            log::warn!("Platform detection failed: {}", e);
            "unknown".to_string()
        }
    };
    let fsldir = runtime.require_base_install_dir()?;

    runtime.progress(&format!("Building on: {}", platform))?;
    runtime.progress(&format!("Using FSL in: {}", fsldir.display()))?;
    runtime.progress(&format!(
        "Local FSL code installed to: {}",
        runtime.dev_install_dir().display()
    ))?;
    if args.debug {
        runtime.progress("Doing debug build")?;
    }
    if windows {
        // Native code is not built on Windows; only Python modules need the MSVC environment.
        if std::env::var_os("VCINSTALLDIR").is_none() {
            return Err(anyhow::anyhow!(
                "You must run this from the Visual Studio tools command line"
            )
            .into());
        }
        runtime.progress(&format!("Build architecture: {}", args.arch))?;
    }

    let mut env = BuildEnvironment::new(runtime.dev_install_dir(), Some(fsldir));
    match machine_type(fsldir).await {
        Ok(machtype) => env = env.with_machine_type(machtype),
        Err(e) => runtime.check(Err(e), "Failed to determine FSLMACHTYPE")?,
    }

    for key in ["FSLDIR", "FSLDEVDIR", "FSLCONFDIR", "FSLMACHTYPE"] {
        let value = env.var(key).unwrap_or_else(|| "(unset)".to_string());
        runtime.verbose_println(&format!("  {}={}", key, value))?;
    }

    runtime.progress(&format!("Installing into {}", runtime.dev_install_dir().display()))?;
    fs::remove_dir_best_effort(runtime.dev_install_dir()).await;
    fs::create_dir_all(runtime.dev_install_dir()).await?;

    let make = Make::new(env.clone());
    let setup_py = SetupPy::new(runtime.python(), env);

    for module in &manifest.modules {
        let dir = runtime.build_dir().join(&module.name);
        if !dir.exists() {
            update_module(module, &manifest.github_org, runtime, git).await?;
        }
        if !dir.is_dir() {
            runtime.warn(&format!("Skipping {}: no checkout at {}", module.name, dir.display()))?;
            continue;
        }

        match build_kind(&dir, args.no_python, windows) {
            BuildKind::Python => build_python(&setup_py, &dir, args, runtime).await?,
            BuildKind::Make => build_make(&make, &dir, args, runtime).await?,
            BuildKind::Skip => {
                runtime.progress(&format!("\nSkipping {} on Windows build", module.name))?
            }
        }
    }
    Ok(())
}

async fn build_make(make: &Make, dir: &Path, args: &Args, runtime: &RuntimeConfig) -> Result<()> {
    runtime.progress(&format!("\nBuilding {} using MAKE", dir.display()))?;
    if args.clean {
        runtime.check(
            make.clean(dir).await,
            &format!("Failed to clean {}", dir.display()),
        )?;
    }
    runtime.check(
        make.build(dir, args.debug).await,
        &format!("Failed to build {}", dir.display()),
    )?;
    if args.install {
        runtime.check(
            make.install(dir).await,
            &format!("Failed to install {}", dir.display()),
        )?;
    }
    Ok(())
}

async fn build_python(
    setup_py: &SetupPy,
    dir: &Path,
    args: &Args,
    runtime: &RuntimeConfig,
) -> Result<()> {
    runtime.progress(&format!("\nBuilding {} using setup.py", dir.display()))?;
    runtime.check(
        setup_py.build(dir).await,
        &format!("Failed to build python module {}", dir.display()),
    )?;
    if args.install {
        runtime.check(
            setup_py.install(dir).await,
            &format!("Failed to install python module {}", dir.display()),
        )?;
    }
    Ok(())
}
