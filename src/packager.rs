//! Packager stage
//!
//! Turns the built payload into a timestamped installer package:
//! rename the framework, hand the payload to root, write the postinstall
//! script, then run pkgbuild.

use chrono::{DateTime, Local};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::BuildConfig;
use crate::error::{PipelineError, Result};
use crate::profiles::Profile;
use crate::tool_runner::CommandRunner;
use crate::tools::package::{ChownArgs, PkgbuildArgs};
use crate::workspace::Workspace;

/// Timestamp format embedded in artifact names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The installer package a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub path: PathBuf,
    pub profile: Profile,
    pub python_version: String,
    pub created_at: DateTime<Local>,
}

/// `<prefix>-<version>-<profile>-<timestamp>.pkg`
pub fn artifact_file_name(
    prefix: &str,
    version: &str,
    profile: Profile,
    created_at: &DateTime<Local>,
) -> String {
    format!(
        "{}-{}-{}-{}.pkg",
        prefix,
        version,
        profile,
        created_at.format(TIMESTAMP_FORMAT)
    )
}

/// Postinstall script body: hide the managed root and the install path.
pub fn postinstall_script(config: &BuildConfig) -> String {
    format!(
        "#!/bin/sh\n/usr/bin/chflags hidden \"{}\"\n/usr/bin/chflags hidden \"{}\"\nexit 0\n",
        config.hidden_root, config.install_location
    )
}

/// Rename the builder output so it does not collide with Apple's framework name.
pub fn rename_framework(ws: &Workspace, config: &BuildConfig) -> Result<PathBuf> {
    let built = ws.payload_dir().join(&config.built_framework_name);
    let installed = ws.payload_dir().join(&config.installed_framework_name);

    fs::rename(&built, &installed).map_err(|e| {
        PipelineError::package_build(format!(
            "failed to rename {} to {}: {}",
            built.display(),
            installed.display(),
            e
        ))
    })?;
    Ok(installed)
}

/// Recursively chown the payload to the configured owner and group.
pub fn set_payload_ownership(
    runner: &impl CommandRunner,
    ws: &Workspace,
    config: &BuildConfig,
) -> Result<()> {
    let args = ChownArgs {
        owner: config.owner.clone(),
        group: config.group.clone(),
        path: ws.payload_dir(),
    };
    runner
        .run_tool(&args)
        .and_then(|out| out.ensure_success("payload ownership change"))
        .map_err(|e| PipelineError::permission(format!("{:#}", e)))
}

/// Write `scripts/postinstall` with mode 0755.
pub fn write_postinstall(ws: &Workspace, config: &BuildConfig) -> Result<PathBuf> {
    let path = ws.scripts_dir().join("postinstall");
    let io_err = |e: std::io::Error| {
        PipelineError::package_build(format!("failed to write {}: {}", path.display(), e))
    };

    fs::write(&path, postinstall_script(config)).map_err(io_err)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(io_err)?;
    Ok(path)
}

/// Run every packaging step and return the written artifact.
pub fn package(
    runner: &impl CommandRunner,
    ws: &Workspace,
    profile: Profile,
    config: &BuildConfig,
    output_dir: &Path,
) -> Result<BuildArtifact> {
    let framework = rename_framework(ws, config)?;
    info!("Framework staged at {}", framework.display());

    set_payload_ownership(runner, ws, config)?;
    write_postinstall(ws, config)?;

    let created_at = Local::now();
    let output = output_dir.join(artifact_file_name(
        &config.artifact_prefix,
        &config.python_version,
        profile,
        &created_at,
    ));
    // Artifacts are write-once
    if fs::symlink_metadata(&output).is_ok() {
        return Err(PipelineError::package_build(format!(
            "{} already exists",
            output.display()
        )));
    }

    let args = PkgbuildArgs {
        root: ws.payload_dir(),
        identifier: config.identifier(profile),
        version: config.python_version.clone(),
        install_location: config.install_location.clone(),
        scripts: ws.scripts_dir(),
        output: output.clone(),
    };
    runner
        .run_tool(&args)
        .and_then(|out| out.ensure_success("pkgbuild"))
        .map_err(|e| PipelineError::package_build(format!("{:#}", e)))?;

    if !output.is_file() {
        return Err(PipelineError::package_build(format!(
            "pkgbuild finished but {} was not written",
            output.display()
        )));
    }

    info!("Package written to {}", output.display());
    Ok(BuildArtifact {
        path: output,
        profile,
        python_version: config.python_version.clone(),
        created_at,
    })
}
