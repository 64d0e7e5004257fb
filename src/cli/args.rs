//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and the
//! [`RuntimeConfig`] derived from it, with every path made absolute once.

use crate::error::{BuildError, CliError, Result};
use clap::{Parser, ValueEnum};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Windows build architecture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Arch {
    /// 32-bit
    X86,
    /// 64-bit
    X64,
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Arch::X86 => "x86",
            Arch::X64 => "x64",
        })
    }
}

/// Master build for the QuBIc imaging modules
#[derive(Parser, Debug)]
#[command(
    name = "qubic_build",
    version,
    about = "Update, rebuild and bundle the QuBIc imaging modules",
    long_about = "Clones or updates every module in the release manifest, builds each with make or setup.py, \
and assembles release bundles as <name>-<version>-<platform>.tar.gz.

Usage:
  qubic_build --update --rebuild --install
  qubic_build --build-bundles
  qubic_build --build-bundles --bundle fabber --continue-on-error

Phases run in the order update, rebuild, bundles."
)]
pub struct Args {
    /// Debug build (`make debug`)
    #[arg(long)]
    pub debug: bool,

    /// Build architecture (Windows only)
    #[arg(long, value_enum, default_value_t = Arch::X64)]
    pub arch: Arch,

    /// Update code from git
    #[arg(long)]
    pub update: bool,

    /// Rebuild code
    #[arg(long)]
    pub rebuild: bool,

    /// Do `make clean` before rebuilding
    #[arg(long)]
    pub clean: bool,

    /// Install code after build
    #[arg(long)]
    pub install: bool,

    /// Don't build Python modules
    #[arg(long)]
    pub no_python: bool,

    /// Development install directory (FSLDEVDIR). Defaults to <root>/install/fsldev
    #[arg(long, value_name = "DIR")]
    pub fsldev: Option<PathBuf>,

    /// Base FSL install directory
    #[arg(long, env = "FSLDIR", value_name = "DIR")]
    pub fsldir: Option<PathBuf>,

    /// Directory holding module checkouts. Defaults to <root>/build
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Directory for staging trees and archives. Defaults to <root>/packages
    #[arg(long, value_name = "DIR")]
    pub package_dir: Option<PathBuf>,

    /// Root for the default directories. Defaults to the current directory
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Build bundle releases
    #[arg(long)]
    pub build_bundles: bool,

    /// Only build the named bundle (repeatable)
    #[arg(long = "bundle", value_name = "NAME")]
    pub bundles: Vec<String>,

    /// Release manifest to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Python interpreter for setup.py builds and module lookup
    #[arg(long, value_name = "PROGRAM", default_value = "python")]
    pub python: PathBuf,

    /// Keep unknown ${...} placeholders verbatim instead of failing
    #[arg(long)]
    pub allow_unknown_placeholders: bool,

    /// Continue build if there is an error
    #[arg(long)]
    pub continue_on_error: bool,

    /// List the bundles in the manifest and exit
    #[arg(long)]
    pub list_bundles: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.bundles.is_empty() && !self.build_bundles {
            return Err("--bundle requires --build-bundles".to_string());
        }
        if self.bundles.iter().any(|b| b.trim().is_empty()) {
            return Err("--bundle names cannot be empty".to_string());
        }
        if (self.clean || self.debug) && !self.rebuild {
            log::warn!("--clean and --debug only take effect with --rebuild");
        }
        Ok(())
    }

    /// Whether any phase was requested.
    pub fn has_work(&self) -> bool {
        self.update || self.rebuild || self.build_bundles
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    continue_on_error: bool,
    root: PathBuf,
    build_dir: PathBuf,
    dev_install_dir: PathBuf,
    base_install_dir: Option<PathBuf>,
    package_dir: PathBuf,
    python: PathBuf,
}

fn absolute(path: &Path, base: &Path) -> Result<PathBuf> {
    Ok(path.absolutize_from(base)?.into_owned())
}

impl TryFrom<&Args> for RuntimeConfig {
    type Error = BuildError;

    fn try_from(args: &Args) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = match &args.root {
            Some(root) => absolute(root, &cwd)?,
            None => cwd.clone(),
        };

        let build_dir = match &args.build_dir {
            Some(dir) => absolute(dir, &cwd)?,
            None => root.join("build"),
        };
        let dev_install_dir = match &args.fsldev {
            Some(dir) => absolute(dir, &cwd)?,
            None => root.join("install").join("fsldev"),
        };
        let package_dir = match &args.package_dir {
            Some(dir) => absolute(dir, &cwd)?,
            None => root.join("packages"),
        };
        let base_install_dir = args
            .fsldir
            .as_deref()
            .filter(|d| !d.as_os_str().is_empty())
            .map(|d| absolute(d, &cwd))
            .transpose()?;

        Ok(Self {
            output: super::OutputManager::new(args.verbose),
            continue_on_error: args.continue_on_error,
            root,
            build_dir,
            dev_install_dir,
            base_install_dir,
            package_dir,
            python: args.python.clone(),
        })
    }
}

impl RuntimeConfig {
    pub fn continue_on_error(&self) -> bool {
        self.continue_on_error
    }

    pub fn root(&self) -> &Path {
        &self.root
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

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Base install directory, or an error naming how to provide it.
    pub fn require_base_install_dir(&self) -> Result<&Path> {
        self.base_install_dir().ok_or_else(|| {
            BuildError::Cli(CliError::MissingArgument {
                argument: "--fsldir (or the FSLDIR environment variable)".to_string(),
            })
        })
    }

    /// Applies the continue-on-error policy to a step result.
    ///
    /// Failures are always reported as `ERROR: <what>`. They are swallowed in
    /// continue-on-error mode and returned otherwise.
    pub fn check(&self, result: crate::bundler::Result<()>, what: &str) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("{}: {:?}", what, e);
                self.output.error(&format!("ERROR: {}: {}", what, e))?;
                if self.continue_on_error {
                    Ok(())
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }
}
