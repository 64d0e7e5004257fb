//! Location of installed Python packages for `${PYTHON}` source roots.

use crate::bundler::{
    error::{Error, Result},
    utils::process::output_in,
};
use std::path::PathBuf;

/// Finds the directory an importable component is installed in.
#[allow(async_fn_in_trait)]
pub trait ModuleLocator {
    /// Package directory of `name`.
    async fn locate(&self, name: &str) -> Result<PathBuf>;
}

const LOCATE_SCRIPT: &str = "import importlib, os, sys; \
m = importlib.import_module(sys.argv[1]); \
print(os.path.dirname(os.path.abspath(m.__file__)))";

/// Asks a Python interpreter where a module was imported from.
#[derive(Clone, Debug)]
pub struct PythonLocator {
    interpreter: PathBuf,
    work_dir: PathBuf,
}

impl PythonLocator {
    /// `interpreter` is run with `work_dir` as its working directory so the
    /// result does not depend on where this process was started.
    pub fn new(interpreter: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            work_dir: work_dir.into(),
        }
    }
}

impl ModuleLocator for PythonLocator {
    async fn locate(&self, name: &str) -> Result<PathBuf> {
        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.args(["-c", LOCATE_SCRIPT, name]);

        let dir = output_in(cmd, &self.work_dir).await.map_err(|e| {
            Error::GenericError(format!("Cannot locate Python module '{name}': {e}"))
        })?;
        let dir = PathBuf::from(dir);
        if !dir.is_dir() {
            crate::bail!(
                "Python module '{}' resolved to {}, which is not a directory",
                name,
                dir.display()
            );
        }
        Ok(dir)
    }
}
