//! Top-level error types for the build tool.
//!
//! Assembly and tool errors come from [`crate::bundler::Error`]; this module
//! wraps them together with CLI, I/O and manifest errors and maps each to a
//! process exit code.

use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for all build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler and external tool errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// One or more bundles could not be assembled in continue-on-error mode
    #[error("{count} bundle(s) failed: {names}")]
    BundlesFailed {
        /// Number of failed bundles
        count: usize,
        /// Comma-separated bundle names
        names: String,
    },
}

impl BuildError {
    /// Process exit code for this error.
    ///
    /// A failed external tool passes its own exit code through; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Bundler(e) => e.tool_exit_code().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}
