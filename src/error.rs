//! Error handling module for relocpkg
//!
//! Every pipeline failure is fatal. Each variant maps to the stage that
//! produced it so the message printed before exit names what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the build pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Profile token missing or not one of the known profiles
    #[error("Invalid profile: {}", describe_given(.given))]
    InvalidProfile { given: Option<String> },

    /// Not running as root, or ownership change refused
    #[error("Permission error: {0}")]
    Permission(String),

    /// Console user could not be resolved to a usable destination
    #[error("Console user error: {0}")]
    ConsoleUser(String),

    /// Required external tools are not installed
    #[error("Missing required tools: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    /// Workspace could not be cleared or created
    #[error("Workspace error at {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder archive download failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Builder archive extraction failed
    #[error("Extract error: {0}")]
    Extract(String),

    /// Relocatable framework build failed
    #[error("Build error: {0}")]
    Build(String),

    /// Installer package assembly failed
    #[error("Package build error: {0}")]
    PackageBuild(String),

    /// Pipeline stage machine rejected a transition
    #[error("Stage transition error: {0}")]
    Transition(String),
}

fn describe_given(given: &Option<String>) -> String {
    let expected = crate::profiles::Profile::valid_names();
    match given {
        Some(p) => format!("'{}' is not a known profile (expected one of: {})", p, expected),
        None => format!("no profile given (expected one of: {})", expected),
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    pub fn console_user(msg: impl Into<String>) -> Self {
        Self::ConsoleUser(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn extract(msg: impl Into<String>) -> Self {
        Self::Extract(msg.into())
    }

    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    pub fn package_build(msg: impl Into<String>) -> Self {
        Self::PackageBuild(msg.into())
    }

    /// Create a workspace error for `path`
    pub fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error. All failures are fatal.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// True when the caller should print usage help alongside the message
    pub fn wants_usage(&self) -> bool {
        matches!(self, Self::InvalidProfile { .. })
    }
}
