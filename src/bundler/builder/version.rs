//! Release version resolution from version-control descriptors.

use crate::bundler::error::{Error, Result};
use regex::Regex;
use std::{path::Path, sync::LazyLock};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+\.\d+\.\d+(-\d+)?)").unwrap_or_else(|e| unreachable!("{e}"))
});

/// Source of raw version descriptors (`git describe` and friends).
#[allow(async_fn_in_trait)]
pub trait VersionControl {
    /// Raw descriptor for the checkout at `dir`.
    ///
    /// Fails if `dir` is not under version control or has no tags.
    async fn describe(&self, dir: &Path) -> Result<String>;
}

/// Normalizes a descriptor to `major.minor.patch[-build]`.
///
/// `v1.2.3-4-gabcdef-dirty` -> `1.2.3-4`, `1.0.0` -> `1.0.0`. Anything that
/// does not start with a numeric triple is a [`Error::VersionParse`].
pub fn normalize_version(raw: &str) -> Result<String> {
    VERSION_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::VersionParse {
            raw: raw.to_string(),
        })
}

/// Describes `dir` and normalizes the result.
pub async fn resolve_version<V: VersionControl>(vcs: &V, dir: &Path) -> Result<String> {
    let raw = vcs.describe(dir).await?;
    log::debug!("{} describes as '{}'", dir.display(), raw);
    normalize_version(&raw)
}
