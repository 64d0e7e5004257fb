//! Bundle assembly and its collaborators.
//!
//! # Overview
//!
//! The assembler, for each bundle:
//! 1. Recreates the staging directory
//! 2. Resolves placeholders in every source root
//! 3. Copies matched files, directories and Python packages
//! 4. Resolves the release version from the version-control checkout
//! 5. Writes `<name>-<version>-<platform>.tar.gz`
//!
//! # Module Organization
//!
//! - [`archive`] - tar.gz writer behind the [`Archiver`] trait
//! - [`locator`] - Python package lookup behind [`ModuleLocator`]
//! - [`matcher`] - glob expansion and copy rules
//! - [`orchestrator`] - the [`Assembler`] itself
//! - [`staging`] - staging directory reset
//! - [`tool_detection`] - cached `PATH` lookups for external tools
//! - [`version`] - descriptor normalization behind [`VersionControl`]

pub mod archive;
pub mod locator;
pub mod matcher;
mod orchestrator;
pub mod staging;
pub mod tool_detection;
pub mod version;

pub use archive::{Archiver, TarGzArchiver};
pub use locator::{ModuleLocator, PythonLocator};
pub use orchestrator::{Assembler, BundledArtifact};
pub use version::{VersionControl, normalize_version, resolve_version};
