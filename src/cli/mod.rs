//! Command line interface for the master build.
//!
//! Parses arguments, resolves directories and runs the requested phases
//! (update, rebuild, bundles) in that order.

mod args;
pub mod commands;
mod output;

pub use args::{Arch, Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};
use crate::manifest::load_manifest;
use crate::source::Git;

/// Main CLI entry point. Returns the process exit code.
pub async fn run(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::try_from(&args)?;
    let manifest = load_manifest(args.manifest.as_deref(), args.allow_unknown_placeholders)?;

    if args.list_bundles {
        for bundle in &manifest.bundles {
            runtime.progress(&format!(
                "{} (version from {})",
                bundle.name(),
                bundle.version_module()
            ))?;
        }
        return Ok(0);
    }

    if !args.has_work() {
        runtime.warn("Nothing to do: pass --update, --rebuild and/or --build-bundles")?;
        return Ok(0);
    }

    if !runtime.build_dir().exists() {
        tokio::fs::create_dir_all(runtime.build_dir()).await?;
    }

    let git = Git::default();

    if args.update {
        commands::update_modules(&manifest, &runtime, &git).await?;
    }

    if args.rebuild {
        commands::rebuild_modules(&manifest, &args, &runtime, &git).await?;
    }

    if args.build_bundles {
        let bundles = manifest.select_bundles(&args.bundles)?;
        commands::build_bundles(&bundles, &runtime, args.allow_unknown_placeholders, git).await?;
    }

    Ok(0)
}

/// Parse arguments without executing (for testing)
pub fn parse_args() -> Args {
    Args::parse_args()
}
