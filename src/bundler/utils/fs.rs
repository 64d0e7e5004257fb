//! File system utilities for bundling.
//!
//! Provides file operations with automatic directory creation, symlink
//! dereferencing, best-effort removal of stale trees and path-aware errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes a directory tree, tolerating read-only entries.
///
/// A first removal attempt that fails is retried after every entry in the
/// tree has been made writable. Whatever still fails after that is logged
/// and swallowed: the caller always gets to continue.
///
/// Returns `true` if the tree is gone afterwards.
pub async fn remove_dir_best_effort(path: &Path) -> bool {
    let first = match fs::remove_dir_all(path).await {
        Ok(()) => return true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return true,
        Err(e) => e,
    };

    log::debug!(
        "Removing {} failed ({}), clearing read-only flags and retrying",
        path.display(),
        first
    );

    let target = path.to_path_buf();
    let retried = tokio::task::spawn_blocking(move || {
        make_tree_writable(&target);
        std::fs::remove_dir_all(&target)
    })
    .await;

    match retried {
        Ok(Ok(())) => true,
        Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => true,
        Ok(Err(e)) => {
            log::error!("Error removing {}: {}", path.display(), e);
            false
        }
        Err(e) => {
            log::error!("Error removing {}: cleanup task panicked: {}", path.display(), e);
            false
        }
    }
}

fn make_tree_writable(root: &Path) {
    for entry in walkdir::WalkDir::new(root).into_iter().flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if entry.file_type().is_symlink() {
            continue;
        }
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                permissions.set_mode(permissions.mode() | 0o700);
            }
            #[cfg(not(unix))]
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            if let Err(e) = std::fs::set_permissions(entry.path(), permissions) {
                log::debug!("Could not make {} writable: {}", entry.path().display(), e);
            }
        }
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Overwrites the destination if it exists.
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are dereferenced: the staged tree holds the contents of their
/// targets, never the links. Dangling or looping links fail the copy.
/// Fails if the source path is not a directory or doesn't exist,
/// or if the destination path already exists.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }
    if fs::try_exists(to).await.unwrap_or(false) {
        return Err(Error::Fs {
            context: "copying directory tree to".to_string(),
            path: to.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
        });
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from).follow_links(true) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            // With follow_links the file type is that of the link target.
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file to", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}
