//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use flate2::read::GzDecoder;
use qubic_build::bundler::{
    self, Assembler, ModuleLocator, PlaceholderEnvironment, Settings, SettingsBuilder,
    TarGzArchiver, VersionControl,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Version control returning a fixed descriptor for every checkout.
pub struct FixedDescribe(pub String);

impl VersionControl for FixedDescribe {
    async fn describe(&self, dir: &Path) -> bundler::Result<String> {
        if !dir.is_dir() {
            return Err(bundler::Error::ExternalTool {
                command: "git describe --dirty".into(),
                code: Some(128),
                stderr: format!("fatal: cannot change to '{}'", dir.display()),
            });
        }
        Ok(self.0.clone())
    }
}

/// Module locator backed by a name -> directory table.
#[derive(Default)]
pub struct TableLocator(pub HashMap<String, PathBuf>);

impl ModuleLocator for TableLocator {
    async fn locate(&self, name: &str) -> bundler::Result<PathBuf> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| bundler::Error::GenericError(format!("No module named '{name}'")))
    }
}

/// Temporary build, dev-install and package trees.
pub struct Workspace {
    pub tmp: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().unwrap(),
        }
    }

    pub fn build_dir(&self) -> PathBuf {
        self.tmp.path().join("build")
    }

    pub fn dev_dir(&self) -> PathBuf {
        self.tmp.path().join("install/fsldev")
    }

    pub fn package_dir(&self) -> PathBuf {
        self.tmp.path().join("packages")
    }

    /// Writes `contents` at `rel` under the workspace, creating parents.
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.tmp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Creates a checkout directory so version resolution can find it.
    pub fn checkout(&self, module: &str) -> PathBuf {
        let dir = self.build_dir().join(module);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn settings(&self, platform: &str) -> Settings {
        SettingsBuilder::new()
            .package_directory(self.package_dir())
            .placeholders(PlaceholderEnvironment::new(
                self.build_dir(),
                self.dev_dir(),
                None,
            ))
            .platform(platform)
            .build()
            .unwrap()
    }

    pub fn assembler(
        &self,
        describe: &str,
        locator: TableLocator,
    ) -> Assembler<FixedDescribe, TableLocator, TarGzArchiver> {
        Assembler::with_collaborators(
            self.settings("linux18"),
            FixedDescribe(describe.to_string()),
            locator,
            TarGzArchiver,
        )
    }
}

/// Member paths of a `.tar.gz`, without trailing slashes, in archive order.
pub fn archive_members(archive: &Path) -> Vec<String> {
    archive_entries(archive).into_iter().map(|(p, _)| p).collect()
}

/// `(path, contents)` for every member of a `.tar.gz`.
pub fn archive_entries(archive: &Path) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let file = std::fs::File::open(archive).unwrap();
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let path = entry
                .path()
                .unwrap()
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string();
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            (path, contents)
        })
        .collect()
}
