//! Error types for bundle assembly.
//!
//! Every failure the assembler can surface is a variant of [`Error`]. The
//! [`ErrorExt`] and [`Context`] traits attach a human-readable context to
//! I/O failures and missing values, and [`bail!`](crate::bail) returns early
//! with a formatted [`Error::GenericError`].

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for bundle assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while assembling bundles or driving external tools.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form error message.
    #[error("{0}")]
    GenericError(String),

    /// Raw I/O error with no path context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem error with the operation and path that failed.
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Directory traversal error while copying a tree.
    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path that does not sit under the tree it was walked from.
    #[error("path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Malformed glob built from a source root and item.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Item pattern violating the relative, single-trailing-glob rule.
    #[error("invalid item pattern '{pattern}' in bundle '{bundle}': {reason}")]
    InvalidItemPattern {
        /// Bundle the item belongs to
        bundle: String,
        /// Offending item
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// `${TOKEN}` that is not a known placeholder.
    #[error(
        "unknown placeholder '${{{token}}}' in '{template}' (use --allow-unknown-placeholders to keep it verbatim)"
    )]
    UnknownPlaceholder {
        /// Token name without `${}`
        token: String,
        /// Template it appeared in
        template: String,
    },

    /// Known placeholder with no value in this environment.
    #[error("placeholder '${{{token}}}' in '{template}' has no value (is it configured?)")]
    UnresolvedPlaceholder {
        /// Token name without `${}`
        token: String,
        /// Template it appeared in
        template: String,
    },

    /// Version-control descriptor not of the form `[v]major.minor.patch[-build]`.
    #[error("failed to parse version string '{raw}'")]
    VersionParse {
        /// Descriptor as returned by version control
        raw: String,
    },

    /// External tool exited unsuccessfully.
    #[error("{command} failed with exit code {}{}", format_code(.code), format_stderr(.stderr))]
    ExternalTool {
        /// Command line that was run
        command: String,
        /// Exit code, `None` if terminated by a signal
        code: Option<i32>,
        /// Captured stderr, empty when the output was inherited
        stderr: String,
    },

    /// Invalid bundle or module definitions.
    #[error("invalid release manifest: {0}")]
    Manifest(String),
}

fn format_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl Error {
    /// Exit code of a failed external tool, if this error came from one.
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            Error::ExternalTool { code, .. } => *code,
            _ => None,
        }
    }
}

/// Attach filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps the error with what was being done and to which path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Convert a missing value or foreign error into a [`Error::GenericError`].
pub trait Context<T> {
    /// Fails with `msg` when the value is absent or an error.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

/// Return early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
