//! External command execution.
//!
//! Every tool is spawned with an explicit working directory; the process-wide
//! current directory is never changed.

use crate::bundler::error::{Error, Result};
use std::path::Path;
use tokio::process::Command;

/// Renders a command as a shell-like string for logs and errors.
pub fn describe_command(command: &Command) -> String {
    let std_cmd = command.as_std();
    let mut parts = vec![std_cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(std_cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Runs a command in `dir` with inherited stdio and fails on a non-zero exit.
pub async fn run_in(mut command: Command, dir: &Path) -> Result<()> {
    command.current_dir(dir);
    let display = describe_command(&command);
    log::debug!("Running `{}` in {}", display, dir.display());

    let status = command
        .status()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to execute `{display}`: {e}")))?;

    if !status.success() {
        return Err(Error::ExternalTool {
            command: display,
            code: status.code(),
            stderr: String::new(),
        });
    }
    Ok(())
}

/// Runs a command in `dir` and returns its trimmed stdout.
///
/// Fails with [`Error::ExternalTool`] carrying the captured stderr when the
/// command exits unsuccessfully.
pub async fn output_in(mut command: Command, dir: &Path) -> Result<String> {
    command.current_dir(dir);
    let display = describe_command(&command);
    log::debug!("Capturing `{}` in {}", display, dir.display());

    let output = command
        .output()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to execute `{display}`: {e}")))?;

    if !output.status.success() {
        return Err(Error::ExternalTool {
            command: display,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_matches(|c| c == ' ' || c == '\n' || c == '\r')
        .to_string())
}
