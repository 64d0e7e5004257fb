//! Staging tree lifecycle.

use crate::bundler::{error::Result, utils::fs};
use std::path::Path;

/// Recreates `staging` as an empty directory.
///
/// Removal of a previous tree is best effort: locked or read-only leftovers
/// are logged and assembly carries on into whatever remains.
pub async fn reset_staging(staging: &Path) -> Result<()> {
    if !fs::remove_dir_best_effort(staging).await {
        log::warn!(
            "Could not fully clean staging directory {}, staging on top of existing contents",
            staging.display()
        );
    }
    fs::create_dir_all(staging).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn previous_contents_are_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("packages/oxasl");
        std::fs::create_dir_all(staging.join("old")).unwrap();
        std::fs::write(staging.join("old/file"), "x").unwrap();

        reset_staging(&staging).await.unwrap();
        assert!(staging.is_dir());
        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn undeletable_staging_is_reused() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let packages = tmp.path().join("packages");
        let staging = packages.join("oxasl");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("stale.txt"), "x").unwrap();
        std::fs::set_permissions(&packages, std::fs::Permissions::from_mode(0o500)).unwrap();

        // Permission bits do not bind root.
        let unprotected = std::fs::write(packages.join("write-check"), "").is_ok();
        let result = reset_staging(&staging).await;
        std::fs::set_permissions(&packages, std::fs::Permissions::from_mode(0o700)).unwrap();

        result.unwrap();
        assert!(staging.is_dir());
        if !unprotected {
            assert!(!staging.join("stale.txt").exists());
        }
    }
}
