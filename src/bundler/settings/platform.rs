//! Platform tag embedded in archive names (`windows`, `osx`, `ubuntu18`, ...).

use crate::bundler::{
    builder::tool_detection::LSB_RELEASE,
    error::{Error, Result},
    utils::process::output_in,
};
use std::path::Path;

/// Detects the platform tag of the build host.
///
/// Windows and macOS map to fixed tags. On other systems the tag is the
/// lowercased distributor id followed by the major release number, taken from
/// `lsb_release` or, when that tool is missing, from `/etc/os-release`.
pub async fn detect_platform(work_dir: &Path) -> Result<String> {
    if cfg!(target_os = "windows") {
        return Ok("windows".to_string());
    }
    if cfg!(target_os = "macos") {
        return Ok("osx".to_string());
    }

    if let Some(lsb_release) = LSB_RELEASE.as_ref() {
        let mut id_cmd = tokio::process::Command::new(lsb_release);
        id_cmd.arg("-is");
        let mut release_cmd = tokio::process::Command::new(lsb_release);
        release_cmd.arg("-rs");

        let distro = output_in(id_cmd, work_dir).await?;
        let release = output_in(release_cmd, work_dir).await?;
        return Ok(platform_tag(&distro, &release));
    }

    log::debug!("lsb_release not found, reading /etc/os-release");
    let os_release = tokio::fs::read_to_string("/etc/os-release")
        .await
        .map_err(|e| {
            Error::GenericError(format!(
                "Cannot determine platform: lsb_release is not installed and /etc/os-release is unreadable ({e}). Use a bundle platform override."
            ))
        })?;
    let (id, version) = parse_os_release(&os_release);
    match id {
        Some(id) => Ok(platform_tag(&id, version.as_deref().unwrap_or(""))),
        None => Err(Error::GenericError(
            "Cannot determine platform: /etc/os-release has no ID".to_string(),
        )),
    }
}

/// `ubuntu` + `18.04` -> `ubuntu18`.
pub fn platform_tag(distro: &str, release: &str) -> String {
    let major = release.trim().split('.').next().unwrap_or("");
    format!("{}{}", distro.trim().to_lowercase(), major)
}

fn parse_os_release(contents: &str) -> (Option<String>, Option<String>) {
    let mut id = None;
    let mut version = None;
    for line in contents.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').to_string();
        match key.trim() {
            "ID" => id = Some(value),
            "VERSION_ID" => version = Some(value),
            _ => {}
        }
    }
    (id, version)
}
