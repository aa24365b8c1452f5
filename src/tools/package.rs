//! Type-safe arguments for payload ownership and package assembly.
//!
//! - `ChownArgs` for `chown -R`
//! - `PkgbuildArgs` for `pkgbuild`

use std::path::PathBuf;

use crate::tool_traits::ToolArgs;

/// Recursive ownership change.
#[derive(Debug, Clone)]
pub struct ChownArgs {
    pub owner: String,
    pub group: String,
    pub path: PathBuf,
}

impl ToolArgs for ChownArgs {
    fn program(&self) -> String {
        super::CHOWN.to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-R".to_string(),
            format!("{}:{}", self.owner, self.group),
            self.path.display().to_string(),
        ]
    }
}

/// Arguments for `pkgbuild` building a component package from a root.
///
/// # Field to Flag Mapping
///
/// | Rust Field         | CLI Flag             | Notes |
/// |--------------------|----------------------|-------|
/// | `root`             | `--root`             | Payload tree |
/// | `identifier`       | `--identifier`       | Receipt identifier |
/// | `version`          | `--version`          | Receipt version |
/// | `install_location` | `--install-location` | Prefix the payload lands under |
/// | `scripts`          | `--scripts`          | Directory holding `postinstall` |
/// | `output`           | positional           | `.pkg` to write |
#[derive(Debug, Clone)]
pub struct PkgbuildArgs {
    pub root: PathBuf,
    pub identifier: String,
    pub version: String,
    pub install_location: String,
    pub scripts: PathBuf,
    pub output: PathBuf,
}

impl ToolArgs for PkgbuildArgs {
    fn program(&self) -> String {
        super::PKGBUILD.to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "--root".to_string(),
            self.root.display().to_string(),
            "--identifier".to_string(),
            self.identifier.clone(),
            "--version".to_string(),
            self.version.clone(),
            "--install-location".to_string(),
            self.install_location.clone(),
            "--scripts".to_string(),
            self.scripts.display().to_string(),
            self.output.display().to_string(),
        ]
    }
}
