//! relocpkg library
//!
//! Builds a relocatable Python framework with the relocatable-python builder
//! and wraps it in a macOS installer package.

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod packager;
pub mod pipeline;
pub mod pipeline_state;
pub mod profiles;
pub mod sanity;
pub mod tool_runner;
pub mod tool_traits;
pub mod tools;
pub mod workspace;

// Re-export main types for convenience
pub use config::{BuildConfig, WorkspaceLocation};
pub use error::PipelineError;
pub use packager::BuildArtifact;
pub use pipeline::Pipeline;
pub use pipeline_state::{PipelineContext, PipelineStage, TransitionError};
pub use profiles::{resolve, Profile};
pub use sanity::{HostEnvironment, Preflight, SystemHost};
pub use tool_runner::{CommandOutput, CommandRunner, SystemRunner};
pub use tool_traits::{CommandSpec, ToolArgs};
pub use workspace::Workspace;
