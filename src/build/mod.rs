//! Module builds: `make` for native code, `setup.py` for Python packages.
//!
//! Each step runs in the module directory with the FSL variables passed
//! explicitly to the child process.

use crate::bundler::{
    Result,
    builder::tool_detection::{MAKE, program},
    utils::process::{output_in, run_in},
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// How a module is built on this host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildKind {
    /// `python setup.py ...`
    Python,
    /// `make ...`
    Make,
    /// Native modules are not built on Windows.
    Skip,
}

/// Picks the build for `module_dir`: Python when it has a `setup.py` and
/// Python builds are enabled, otherwise make (except on Windows).
pub fn build_kind(module_dir: &Path, no_python: bool, windows: bool) -> BuildKind {
    if module_dir.join("setup.py").exists() && !no_python {
        BuildKind::Python
    } else if !windows {
        BuildKind::Make
    } else {
        BuildKind::Skip
    }
}

/// Environment variables every module build sees.
#[derive(Clone, Debug, Default)]
pub struct BuildEnvironment {
    vars: Vec<(String, PathBuf)>,
    machine_type: Option<String>,
}

impl BuildEnvironment {
    /// `FSLDEVDIR` always; `FSLDIR` and `FSLCONFDIR` when a base install is known.
    pub fn new(dev_install_dir: &Path, base_install_dir: Option<&Path>) -> Self {
        let mut vars = vec![("FSLDEVDIR".to_string(), dev_install_dir.to_path_buf())];
        if let Some(fsldir) = base_install_dir {
            vars.push(("FSLDIR".to_string(), fsldir.to_path_buf()));
            vars.push(("FSLCONFDIR".to_string(), fsldir.join("config")));
        }
        Self {
            vars,
            machine_type: None,
        }
    }

    /// Adds `FSLMACHTYPE`.
    pub fn with_machine_type(mut self, machine_type: impl Into<String>) -> Self {
        self.machine_type = Some(machine_type.into());
        self
    }

    /// Applies the variables to a child command.
    pub fn apply(&self, cmd: &mut Command) {
        for (key, value) in &self.vars {
            cmd.env(key, value);
        }
        if let Some(machine_type) = &self.machine_type {
            cmd.env("FSLMACHTYPE", machine_type);
        }
    }

    /// Value of a variable set by this environment.
    pub fn var(&self, key: &str) -> Option<String> {
        if key == "FSLMACHTYPE" {
            return self.machine_type.clone();
        }
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.to_string_lossy().into_owned())
    }
}

/// Runs `<FSLDIR>/etc/fslconf/fslmachtype.sh` and returns its output.
pub async fn machine_type(base_install_dir: &Path) -> Result<String> {
    let script = base_install_dir
        .join("etc")
        .join("fslconf")
        .join("fslmachtype.sh");
    output_in(Command::new(script), base_install_dir).await
}

/// Make targets for one module.
#[derive(Clone, Debug)]
pub struct Make {
    program: PathBuf,
    env: BuildEnvironment,
}

impl Make {
    pub fn new(env: BuildEnvironment) -> Self {
        Self {
            program: program(&MAKE, "make"),
            env,
        }
    }

    async fn target(&self, module_dir: &Path, target: Option<&str>) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(target);
        self.env.apply(&mut cmd);
        run_in(cmd, module_dir).await
    }

    /// `make clean`
    pub async fn clean(&self, module_dir: &Path) -> Result<()> {
        self.target(module_dir, Some("clean")).await
    }

    /// `make`, or `make debug` for debug builds.
    pub async fn build(&self, module_dir: &Path, debug: bool) -> Result<()> {
        self.target(module_dir, debug.then_some("debug")).await
    }

    /// `make install`
    pub async fn install(&self, module_dir: &Path) -> Result<()> {
        self.target(module_dir, Some("install")).await
    }
}

/// `setup.py` steps for one module.
#[derive(Clone, Debug)]
pub struct SetupPy {
    interpreter: PathBuf,
    env: BuildEnvironment,
}

impl SetupPy {
    pub fn new(interpreter: impl Into<PathBuf>, env: BuildEnvironment) -> Self {
        Self {
            interpreter: interpreter.into(),
            env,
        }
    }

    async fn run(&self, module_dir: &Path, args: &[&str]) -> Result<()> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("setup.py").args(args);
        self.env.apply(&mut cmd);
        run_in(cmd, module_dir).await
    }

    /// `python setup.py sdist bdist`
    pub async fn build(&self, module_dir: &Path) -> Result<()> {
        self.run(module_dir, &["sdist", "bdist"]).await
    }

    /// `python setup.py install`
    pub async fn install(&self, module_dir: &Path) -> Result<()> {
        self.run(module_dir, &["install"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_py_selects_python_build() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(build_kind(tmp.path(), false, false), BuildKind::Make);
        assert_eq!(build_kind(tmp.path(), false, true), BuildKind::Skip);

        std::fs::write(tmp.path().join("setup.py"), "").unwrap();
        assert_eq!(build_kind(tmp.path(), false, false), BuildKind::Python);
        assert_eq!(build_kind(tmp.path(), true, false), BuildKind::Make);
        assert_eq!(build_kind(tmp.path(), true, true), BuildKind::Skip);
    }

    #[cfg(unix)]
    #[test]
    fn environment_derives_confdir() {
        let env = BuildEnvironment::new(Path::new("/dev"), Some(Path::new("/fsl")))
            .with_machine_type("linux_64-gcc4.8");
        assert_eq!(env.var("FSLDEVDIR").as_deref(), Some("/dev"));
        assert_eq!(env.var("FSLDIR").as_deref(), Some("/fsl"));
        assert_eq!(env.var("FSLCONFDIR").as_deref(), Some("/fsl/config"));
        assert_eq!(env.var("FSLMACHTYPE").as_deref(), Some("linux_64-gcc4.8"));

        let bare = BuildEnvironment::new(Path::new("/dev"), None);
        assert_eq!(bare.var("FSLDIR"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn setup_py_runs_in_module_dir_with_env() {
        let tmp = tempfile::tempdir().unwrap();
        let module = tmp.path().join("module");
        std::fs::create_dir_all(&module).unwrap();
        // `sh setup.py ...` stands in for the Python interpreter.
        std::fs::write(module.join("setup.py"), "echo \"$FSLDEVDIR $*\" > ran.txt\n").unwrap();

        let setup = SetupPy::new("sh", BuildEnvironment::new(Path::new("/dev"), None));
        setup.build(&module).await.unwrap();
        let ran = std::fs::read_to_string(module.join("ran.txt")).unwrap();
        assert_eq!(ran.trim(), "/dev sdist bdist");
    }
}
