//! Master build library for the QuBIc imaging modules.
//!
//! This library provides:
//! - Release bundle assembly ([`bundler`]): placeholder resolution, glob
//!   staging, version tagging and `.tar.gz` packaging
//! - Module update and build ([`source`], [`build`]) through git, make and
//!   setup.py
//! - The release manifest ([`manifest`]) and the CLI ([`cli`])
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod build;
pub mod bundler;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod source;

// Re-export commonly used types
pub use error::{BuildError, CliError, Result};
