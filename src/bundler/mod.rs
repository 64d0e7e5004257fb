//! Release bundle assembly.
//!
//! Turns declarative [`BundleDefinition`]s into staging trees and
//! `<name>-<version>-<platform>.tar.gz` archives.

pub mod builder;
pub mod error;
pub mod settings;
pub mod utils;

pub use builder::{
    Archiver, Assembler, BundledArtifact, ModuleLocator, PythonLocator, TarGzArchiver,
    VersionControl,
};
pub use error::{Error, Result};
pub use settings::{
    BundleDefinition, PlaceholderEnvironment, Settings, SettingsBuilder, SourceRoot, SourceRule,
};
