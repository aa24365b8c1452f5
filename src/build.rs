//! Fetch & build stage
//!
//! Downloads the relocatable-python builder, unpacks it, and runs it to
//! produce `Python.framework` inside the workspace payload. Each step blocks
//! on its external tool and depends on the one before it.

use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::BuildConfig;
use crate::error::{PipelineError, Result};
use crate::profiles::Profile;
use crate::tool_runner::CommandRunner;
use crate::tools::build::RelocatablePythonArgs;
use crate::tools::fetch::{CurlDownloadArgs, UnzipArgs};
use crate::workspace::Workspace;

/// Download the builder archive into the workspace.
pub fn fetch_builder(
    runner: &impl CommandRunner,
    ws: &Workspace,
    config: &BuildConfig,
) -> Result<PathBuf> {
    let archive = ws.archive_path();
    info!("Downloading builder from {}", config.builder_url);

    let args = CurlDownloadArgs {
        url: config.builder_url.clone(),
        output: archive.clone(),
    };
    runner
        .run_tool(&args)
        .and_then(|out| out.ensure_success("builder download"))
        .map_err(|e| PipelineError::fetch(format!("{:#}", e)))?;

    if !archive.is_file() {
        return Err(PipelineError::fetch(format!(
            "download reported success but {} is missing",
            archive.display()
        )));
    }

    Ok(archive)
}

/// Extract the builder archive and return the path of the builder script.
pub fn extract_builder(
    runner: &impl CommandRunner,
    ws: &Workspace,
    config: &BuildConfig,
) -> Result<PathBuf> {
    let args = UnzipArgs {
        archive: ws.archive_path(),
        destination: ws.builder_dir(),
    };
    runner
        .run_tool(&args)
        .and_then(|out| out.ensure_success("builder extraction"))
        .map_err(|e| PipelineError::extract(format!("{:#}", e)))?;

    let script = builder_script_path(ws, config);
    if !script.is_file() {
        return Err(PipelineError::extract(format!(
            "builder script {} not found in archive",
            script.display()
        )));
    }

    info!("Builder extracted to {}", ws.builder_dir().display());
    Ok(script)
}

/// Where the builder script lands after extraction.
pub fn builder_script_path(ws: &Workspace, config: &BuildConfig) -> PathBuf {
    ws.builder_dir()
        .join(&config.builder_dir_name)
        .join(&config.builder_script)
}

/// Write the requirements file and run the builder into the payload.
///
/// Returns the path of the built framework.
pub fn build_framework(
    runner: &impl CommandRunner,
    ws: &Workspace,
    profile: Profile,
    config: &BuildConfig,
) -> Result<PathBuf> {
    let requirements = ws.requirements_path();
    fs::write(&requirements, profile.requirements()).map_err(|e| {
        PipelineError::build(format!(
            "failed to write {}: {}",
            requirements.display(),
            e
        ))
    })?;
    info!(
        "Building Python {} framework with {} packages ({})",
        config.python_version,
        profile.packages().len(),
        profile
    );

    let args = RelocatablePythonArgs {
        script: builder_script_path(ws, config),
        python_version: config.python_version.clone(),
        requirements_file: requirements,
        destination: ws.payload_dir(),
    };
    runner
        .run_tool(&args)
        .and_then(|out| out.ensure_success("framework build"))
        .map_err(|e| PipelineError::build(format!("{:#}", e)))?;

    let framework = ws.payload_dir().join(&config.built_framework_name);
    if !framework.is_dir() {
        return Err(PipelineError::build(format!(
            "builder finished but {} was not produced",
            framework.display()
        )));
    }

    Ok(framework)
}
