//! Build configuration
//!
//! There is no configuration file. Defaults are compiled in and the CLI
//! (or its environment variables) overrides individual fields.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::profiles::Profile;

/// Relocatable-python builder archive (GitHub branch snapshot).
pub const DEFAULT_BUILDER_URL: &str =
    "https://github.com/gregneagle/relocatable-python/archive/refs/heads/main.zip";

/// Top-level directory inside the builder archive.
pub const DEFAULT_BUILDER_DIR: &str = "relocatable-python-main";

/// Builder entry point inside `DEFAULT_BUILDER_DIR`.
pub const BUILDER_SCRIPT: &str = "make_relocatable_python_framework.py";

/// Python version built when none is requested.
pub const DEFAULT_PYTHON_VERSION: &str = "3.11.9";

/// Where the framework lands on client machines.
pub const INSTALL_LOCATION: &str = "/Library/ManagedFrameworks/Python";

/// Parent directory hidden from Finder after install.
pub const HIDDEN_ROOT: &str = "/Library/ManagedFrameworks";

/// Name the builder gives its output.
pub const BUILT_FRAMEWORK_NAME: &str = "Python.framework";

/// Name the framework is installed under, distinct from Apple's `Python.framework`.
pub const INSTALLED_FRAMEWORK_NAME: &str = "Python3.framework";

/// Where the workspace lives for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceLocation {
    /// A fresh, uniquely named directory under `parent`.
    Unique { parent: PathBuf },
    /// A fixed path, removed first if it already exists.
    Fixed(PathBuf),
}

/// Resolved settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub python_version: String,
    pub builder_url: String,
    pub builder_dir_name: String,
    pub builder_script: String,
    pub install_location: String,
    pub hidden_root: String,
    pub built_framework_name: String,
    pub installed_framework_name: String,
    pub identifier_prefix: String,
    pub artifact_prefix: String,
    pub owner: String,
    pub group: String,
    pub workspace: WorkspaceLocation,
    /// Artifact directory. `None` means the console user's Desktop.
    pub output_dir: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            builder_url: DEFAULT_BUILDER_URL.to_string(),
            builder_dir_name: DEFAULT_BUILDER_DIR.to_string(),
            builder_script: BUILDER_SCRIPT.to_string(),
            install_location: INSTALL_LOCATION.to_string(),
            hidden_root: HIDDEN_ROOT.to_string(),
            built_framework_name: BUILT_FRAMEWORK_NAME.to_string(),
            installed_framework_name: INSTALLED_FRAMEWORK_NAME.to_string(),
            identifier_prefix: "org.macadmins.python".to_string(),
            artifact_prefix: "python".to_string(),
            owner: "root".to_string(),
            group: "wheel".to_string(),
            workspace: WorkspaceLocation::Unique {
                parent: std::env::temp_dir(),
            },
            output_dir: None,
        }
    }
}

impl BuildConfig {
    /// Apply command-line overrides on top of the defaults.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();

        if let Some(ref version) = cli.python_version {
            config.python_version = version.clone();
        }
        if let Some(ref url) = cli.builder_url {
            config.builder_url = url.clone();
        }
        if let Some(ref dir) = cli.workspace {
            config.workspace = WorkspaceLocation::Fixed(dir.clone());
        }
        config.output_dir = cli.output_dir.clone();

        config
    }

    /// Package receipt identifier for `profile`.
    pub fn identifier(&self, profile: Profile) -> String {
        format!("{}.{}", self.identifier_prefix, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.python_version, "3.11.9");
        assert_eq!(config.install_location, "/Library/ManagedFrameworks/Python");
        assert!(config.install_location.starts_with(&config.hidden_root));
        assert_eq!(config.owner, "root");
        assert_eq!(config.group, "wheel");
        assert!(matches!(config.workspace, WorkspaceLocation::Unique { .. }));
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_identifier_includes_profile() {
        let config = BuildConfig::default();
        assert_eq!(
            config.identifier(Profile::Recommended),
            "org.macadmins.python.recommended"
        );
    }

    #[test]
    fn test_from_cli_overrides() {
        let cli = Cli::try_parse_from([
            "relocpkg",
            "--python-version",
            "3.12.4",
            "--workspace",
            "/tmp/relocpkg-ws",
            "--output-dir",
            "/tmp/out",
            "minimal",
        ])
        .unwrap();

        let config = BuildConfig::from_cli(&cli);
        assert_eq!(config.python_version, "3.12.4");
        assert_eq!(
            config.workspace,
            WorkspaceLocation::Fixed(PathBuf::from("/tmp/relocpkg-ws"))
        );
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.builder_url, DEFAULT_BUILDER_URL);
    }
}
