//! Source repository operations through the `git` command line.

use crate::bundler::{
    Result,
    builder::{
        VersionControl,
        tool_detection::{GIT, program},
    },
    utils::process::{output_in, run_in},
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// HTTPS clone URL of a module hosted under a GitHub organisation.
pub fn github_url(org: &str, module: &str) -> String {
    format!("https://github.com/{}/{}.git", org, module)
}

/// `git` invoked with explicit working directories.
#[derive(Clone, Debug)]
pub struct Git {
    program: PathBuf,
}

impl Default for Git {
    fn default() -> Self {
        Self {
            program: program(&GIT, "git"),
        }
    }
}

impl Git {
    fn command(&self) -> Command {
        Command::new(&self.program)
    }

    /// Clones `url` into `dest`; `dest` must not exist yet.
    pub async fn clone_into(&self, url: &str, dest: &Path) -> Result<()> {
        let parent = dest.parent().unwrap_or(Path::new("."));
        tokio::fs::create_dir_all(parent).await?;

        let mut cmd = self.command();
        cmd.arg("clone").arg(url).arg(dest);
        run_in(cmd, parent).await
    }

    /// Fast-forwards the checkout at `dir` from its upstream.
    pub async fn pull(&self, dir: &Path) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("pull");
        run_in(cmd, dir).await
    }

    /// Switches the checkout at `dir` to `rev` (branch or tag).
    pub async fn checkout(&self, dir: &Path, rev: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["checkout", rev]);
        run_in(cmd, dir).await
    }
}

impl VersionControl for Git {
    /// `git describe --dirty`, e.g. `v1.2.3-4-gabcdef-dirty`.
    async fn describe(&self, dir: &Path) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["describe", "--dirty"]);
        output_in(cmd, dir).await
    }
}
