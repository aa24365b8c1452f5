//! Pre-flight checks for the runtime environment
//!
//! Runs before the workspace is created, so a failure here leaves the
//! filesystem untouched:
//! - Running with root privileges (EUID 0)
//! - Required tools are present
//! - The artifact destination is known (console user's Desktop, or `--output-dir`)
//! - The workspace is safe to clear and does not contain the destination

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{BuildConfig, WorkspaceLocation};
use crate::error::{PipelineError, Result};
use crate::tool_runner::{CommandRunner, SystemRunner};
use crate::tools::{self, system::ConsoleUserArgs};

/// Console owners that mean nobody is logged in at the GUI.
const NON_USER_CONSOLE_OWNERS: &[&str] = &["root", "loginwindow", "_mbsetupuser"];

/// Facts about the host the pipeline needs before it starts.
pub trait HostEnvironment {
    /// Effective user is root.
    fn is_privileged(&self) -> bool;

    /// Tool exists at `path`.
    fn has_tool(&self, path: &str) -> bool;

    /// Raw owner of `/dev/console`, trimmed. `None` if the lookup failed.
    fn console_user(&self) -> Option<String>;

    /// Home directory of `user` from the user database.
    fn home_dir(&self, user: &str) -> Option<PathBuf>;
}

/// The machine the tool is running on.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl HostEnvironment for SystemHost {
    fn is_privileged(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }

    fn has_tool(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn console_user(&self) -> Option<String> {
        match SystemRunner.run_tool(&ConsoleUserArgs) {
            Ok(out) if out.success => Some(out.stdout.trim().to_string()),
            Ok(out) => {
                warn!("Console user lookup failed: {}", out.stderr.trim());
                None
            }
            Err(e) => {
                warn!("Console user lookup failed: {:#}", e);
                None
            }
        }
    }

    fn home_dir(&self, user: &str) -> Option<PathBuf> {
        match nix::unistd::User::from_name(user) {
            Ok(Some(record)) => Some(record.dir),
            Ok(None) => None,
            Err(e) => {
                warn!("User database lookup for {} failed: {}", user, e);
                None
            }
        }
    }
}

/// Outcome of the pre-flight checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    /// Directory the artifact will be written to.
    pub output_dir: PathBuf,
}

/// Tools from `REQUIRED_TOOLS` the host does not have.
pub fn missing_tools(host: &impl HostEnvironment) -> Vec<String> {
    tools::REQUIRED_TOOLS
        .iter()
        .filter(|tool| !host.has_tool(tool))
        .map(|tool| tool.to_string())
        .collect()
}

/// Check for root privileges only.
pub fn ensure_privileged(host: &impl HostEnvironment) -> Result<()> {
    if host.is_privileged() {
        Ok(())
    } else {
        Err(PipelineError::permission(
            "root privileges required; run with sudo",
        ))
    }
}

/// Resolve the destination directory for the artifact.
///
/// Fails fast when no real user owns the console, instead of writing to a
/// path built from an empty or system user name.
pub fn resolve_output_dir(host: &impl HostEnvironment, config: &BuildConfig) -> Result<PathBuf> {
    if let Some(ref dir) = config.output_dir {
        if !dir.is_dir() {
            return Err(PipelineError::console_user(format!(
                "output directory {} does not exist",
                dir.display()
            )));
        }
        return Ok(dir.clone());
    }

    let user = host
        .console_user()
        .ok_or_else(|| PipelineError::console_user("could not determine the console user"))?;

    if user.is_empty() || NON_USER_CONSOLE_OWNERS.contains(&user.as_str()) {
        return Err(PipelineError::console_user(format!(
            "no user is logged in at the console (owner: '{}'); pass --output-dir",
            user
        )));
    }
    debug!("Console user: {}", user);

    let home = host.home_dir(&user).ok_or_else(|| {
        PipelineError::console_user(format!("no user database entry for '{}'", user))
    })?;

    let desktop = home.join("Desktop");
    if !desktop.is_dir() {
        return Err(PipelineError::console_user(format!(
            "desktop directory {} does not exist",
            desktop.display()
        )));
    }

    Ok(desktop)
}

/// Absolute form of `path` with symlinks resolved as far as the path exists.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();

    loop {
        if let Ok(real) = existing.canonicalize() {
            return missing.iter().rev().fold(real, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

fn refuse_workspace(path: &Path, reason: String) -> PipelineError {
    PipelineError::workspace(path, io::Error::new(io::ErrorKind::InvalidInput, reason))
}

/// Check that a fixed workspace can be cleared without destroying anything
/// outside it.
///
/// A fixed workspace is removed recursively before the fetch and again after
/// packaging, so it must not be the filesystem root, must not hold the
/// console user's home, and must not hold the artifact directory. A unique
/// workspace is always a fresh child of its parent and needs no check.
pub fn check_workspace_location(
    host: &impl HostEnvironment,
    config: &BuildConfig,
    output_dir: &Path,
) -> Result<()> {
    let WorkspaceLocation::Fixed(root) = &config.workspace else {
        return Ok(());
    };
    let workspace = normalize(root);

    if workspace.parent().is_none() {
        return Err(refuse_workspace(
            root,
            "refusing to use the filesystem root as a workspace".to_string(),
        ));
    }

    if let Some(user) = host.console_user().filter(|u| !u.is_empty()) {
        let home = host.home_dir(&user).map(|h| normalize(&h));
        if home.is_some_and(|h| h.starts_with(&workspace)) {
            return Err(refuse_workspace(
                root,
                format!("workspace would remove the home directory of '{}'", user),
            ));
        }
    }

    if normalize(output_dir).starts_with(&workspace) {
        return Err(refuse_workspace(
            root,
            format!(
                "artifact directory {} is inside the workspace",
                output_dir.display()
            ),
        ));
    }

    Ok(())
}

/// Perform all pre-flight checks in order: privilege, tools, destination,
/// workspace location.
pub fn run_preflight_checks(
    host: &impl HostEnvironment,
    config: &BuildConfig,
) -> Result<Preflight> {
    debug!("Running pre-flight checks...");

    ensure_privileged(host)?;

    let missing = missing_tools(host);
    if !missing.is_empty() {
        return Err(PipelineError::MissingTools(missing));
    }

    let output_dir = resolve_output_dir(host, config)?;
    check_workspace_location(host, config, &output_dir)?;

    info!("Pre-flight checks passed, artifact directory {}", output_dir.display());
    Ok(Preflight { output_dir })
}
