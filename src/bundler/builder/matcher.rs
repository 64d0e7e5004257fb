//! Item matching and copying into a staging tree.

use super::locator::ModuleLocator;
use crate::bundler::{error::Result, utils::fs};
use glob::MatchOptions;
use std::path::{Path, PathBuf};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expands `item` relative to `root`.
///
/// `*` matches within one path segment only. Paths are returned in sorted
/// order; an item with no matches yields an empty list.
pub fn expand(root: &Path, item: &str) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/{}", root.trim_end_matches(['/', '\\']), item);

    let mut matches = Vec::new();
    for entry in glob::glob_with(&pattern, MATCH_OPTIONS)? {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => log::warn!("Skipping unreadable match for {}: {}", pattern, e),
        }
    }
    matches.sort();
    Ok(matches)
}

/// Where a match for `item` lands: `<staging>/<dirname(item)>/<basename(match)>`.
///
/// The directory comes from the pattern, not the match, so `bin/fabber*`
/// stages every match directly under `bin/`.
pub fn destination(staging: &Path, item: &str, matched: &Path) -> PathBuf {
    let dest_dir = match Path::new(item).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => staging.join(dir),
        _ => staging.to_path_buf(),
    };
    match matched.file_name() {
        Some(name) => dest_dir.join(name),
        None => dest_dir,
    }
}

/// Copies every match of every item under `root` into `staging`.
///
/// Directories are copied recursively and must not already be staged;
/// files overwrite. Returns the staged destination paths.
pub async fn stage_items(root: &Path, items: &[String], staging: &Path) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::new();

    for item in items {
        let matches = expand(root, item)?;
        if matches.is_empty() {
            log::debug!("No match for {} in {}", item, root.display());
            continue;
        }

        for src in matches {
            let dest = destination(staging, item, &src);
            log::info!("{} -> {}", src.display(), dest.display());

            if src.is_dir() {
                fs::copy_dir(&src, &dest).await?;
            } else {
                fs::copy_file(&src, &dest).await?;
            }
            staged.push(dest);
        }
    }

    Ok(staged)
}

/// Copies each named module's package tree to `<staging>/<name>`.
pub async fn stage_modules<L: ModuleLocator>(
    locator: &L,
    names: &[String],
    staging: &Path,
) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::new();
    for name in names {
        let src = locator.locate(name).await?;
        let dest = staging.join(name);
        log::info!("{} -> {}", src.display(), dest.display());
        fs::copy_dir(&src, &dest).await?;
        staged.push(dest);
    }
    Ok(staged)
}
