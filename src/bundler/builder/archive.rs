//! Compressed tar archives of staging trees.

use crate::bundler::error::{Context, Error, ErrorExt, Result};
use flate2::{Compression, write::GzEncoder};
use std::path::{Path, PathBuf};

/// Writes a staging directory to an archive file.
#[allow(async_fn_in_trait)]
pub trait Archiver {
    /// Archives `dir` into `output` with `dir`'s own name as the root entry.
    /// An existing `output` is overwritten.
    async fn compress(&self, dir: &Path, output: &Path) -> Result<()>;
}

/// Native `.tar.gz` writer.
///
/// Entries are appended in sorted order with deterministic headers (no
/// owners, fixed mtime), so unchanged inputs produce the same members.
#[derive(Clone, Copy, Debug, Default)]
pub struct TarGzArchiver;

impl Archiver for TarGzArchiver {
    async fn compress(&self, dir: &Path, output: &Path) -> Result<()> {
        let dir = dir.to_path_buf();
        let output = output.to_path_buf();

        tokio::task::spawn_blocking(move || write_tar_gz(&dir, &output))
            .await
            .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))?
    }
}

fn write_tar_gz(dir: &Path, output: &Path) -> Result<()> {
    let root_name = PathBuf::from(
        dir.file_name()
            .context(format!("{} has no directory name", dir.display()))?,
    );

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }
    let file = std::fs::File::create(output).fs_context("creating archive", output)?;

    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.mode(tar::HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    let walker = walkdir::WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        let name = root_name.join(entry.path().strip_prefix(dir)?);

        if entry.file_type().is_dir() {
            builder
                .append_dir(&name, entry.path())
                .fs_context("archiving directory", entry.path())?;
        } else {
            builder
                .append_path_with_name(entry.path(), &name)
                .fs_context("archiving", entry.path())?;
        }
    }

    let encoder = builder
        .into_inner()
        .fs_context("finishing archive", output)?;
    encoder.finish().fs_context("compressing archive", output)?;
    Ok(())
}
