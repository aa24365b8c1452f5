//! Ephemeral build workspace
//!
//! One `Workspace` exists per run. It is created before the fetch stage
//! and removed only after the package has been written. On failure it is
//! retained for inspection and the caller is responsible for removing it.
//!
//! ```text
//! <root>/
//!   downloads/         builder archive
//!   builder/           extracted builder
//!   payload/           package root (builder destination)
//!   scripts/           postinstall
//!   requirements.txt   pip package list
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::WorkspaceLocation;
use crate::error::{PipelineError, Result};

const WORKSPACE_PREFIX: &str = "relocpkg-";
const ARCHIVE_NAME: &str = "relocatable-python.zip";

/// Workspace root plus its role subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Prepare a workspace at the configured location.
    pub fn create(location: &WorkspaceLocation) -> Result<Self> {
        match location {
            WorkspaceLocation::Unique { parent } => Self::create_unique(parent),
            WorkspaceLocation::Fixed(root) => Self::prepare(root),
        }
    }

    /// Allocate a uniquely named workspace under `parent`.
    pub fn create_unique(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| PipelineError::workspace(parent, e))?;
        // Ownership passes to `Workspace`; removal is explicit.
        let root = dir.keep();
        Self::prepare(&root)
    }

    /// Clear any stale tree at `root`, then create it and every role directory.
    pub fn prepare(root: &Path) -> Result<Self> {
        if root.parent().is_none() {
            return Err(PipelineError::workspace(
                root,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "a workspace needs a parent directory",
                ),
            ));
        }
        if fs::symlink_metadata(root).is_ok() {
            info!("Removing stale workspace {}", root.display());
            remove_path(root).map_err(|e| PipelineError::workspace(root, e))?;
        }

        let workspace = Self {
            root: root.to_path_buf(),
        };
        for dir in workspace.role_dirs() {
            fs::create_dir_all(&dir).map_err(|e| PipelineError::workspace(&dir, e))?;
        }

        debug!("Workspace prepared at {}", root.display());
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the builder archive is downloaded into.
    pub fn downloads_dir(&self) -> PathBuf {
        self.root.join("downloads")
    }

    /// Downloaded builder archive.
    pub fn archive_path(&self) -> PathBuf {
        self.downloads_dir().join(ARCHIVE_NAME)
    }

    /// Extraction target for the builder archive.
    pub fn builder_dir(&self) -> PathBuf {
        self.root.join("builder")
    }

    /// Package root handed to pkgbuild.
    pub fn payload_dir(&self) -> PathBuf {
        self.root.join("payload")
    }

    /// Scripts directory handed to pkgbuild.
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.root.join("requirements.txt")
    }

    fn role_dirs(&self) -> [PathBuf; 4] {
        [
            self.downloads_dir(),
            self.builder_dir(),
            self.payload_dir(),
            self.scripts_dir(),
        ]
    }

    /// Delete the whole workspace tree.
    pub fn remove(self) -> Result<()> {
        info!("Removing workspace {}", self.root.display());
        fs::remove_dir_all(&self.root).map_err(|e| PipelineError::workspace(&self.root, e))
    }
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
