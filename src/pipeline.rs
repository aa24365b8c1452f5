//! Build pipeline orchestration
//!
//! Runs the stages strictly in order and drives `PipelineContext` through
//! each transition. Every error aborts the run immediately.
//!
//! # Cleanup policy
//!
//! The workspace is removed only after the package has been written. On any
//! failure after it was created it is retained, its path is logged, and the
//! caller is responsible for removing it.

use tracing::{debug, error, info, warn};

use crate::build;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::packager::{self, BuildArtifact};
use crate::pipeline_state::{PipelineContext, PipelineStage};
use crate::profiles::{self, Profile};
use crate::sanity::{self, HostEnvironment};
use crate::tool_runner::CommandRunner;
use crate::workspace::Workspace;

/// One run of the pipeline.
pub struct Pipeline<'a, R: CommandRunner, H: HostEnvironment> {
    config: &'a BuildConfig,
    runner: &'a R,
    host: &'a H,
    context: PipelineContext,
    workspace: Option<Workspace>,
}

impl<'a, R: CommandRunner, H: HostEnvironment> Pipeline<'a, R, H> {
    pub fn new(config: &'a BuildConfig, runner: &'a R, host: &'a H) -> Self {
        Self {
            config,
            runner,
            host,
            context: PipelineContext::new(),
            workspace: None,
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Workspace left behind by a failed run, if one was created.
    pub fn retained_workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Resolve `profile_token` and run every stage through to cleanup.
    pub fn run(&mut self, profile_token: Option<&str>) -> Result<BuildArtifact> {
        match self.run_stages(profile_token) {
            Ok(artifact) => {
                let stages: Vec<String> = self
                    .context
                    .stage_history()
                    .iter()
                    .map(|(stage, _)| stage.to_string())
                    .collect();
                debug!("Stages completed: {}", stages.join(" -> "));
                Ok(artifact)
            }
            Err(err) => {
                if self.context.fail().is_err() {
                    warn!(
                        "Failure reported after terminal stage {}",
                        self.context.current_stage()
                    );
                }
                error!(
                    "Pipeline failed during '{}': {}",
                    next_stage_label(self.context.failed_at()),
                    err
                );
                if let Some(ws) = &self.workspace {
                    warn!(
                        "Workspace retained at {} for inspection; remove it manually",
                        ws.root().display()
                    );
                }
                Err(err)
            }
        }
    }

    fn run_stages(&mut self, profile_token: Option<&str>) -> Result<BuildArtifact> {
        let profile: Profile = profiles::resolve(profile_token)?;
        info!("Profile '{}': {}", profile, profile.description());
        self.context.transition_to(PipelineStage::ProfileResolved)?;

        // Nothing on disk may change before this passes
        let preflight = sanity::run_preflight_checks(self.host, self.config)?;

        let ws = Workspace::create(&self.config.workspace)?;
        info!("Workspace: {}", ws.root().display());
        self.workspace = Some(ws.clone());
        self.context.transition_to(PipelineStage::WorkspacePrepared)?;

        build::fetch_builder(self.runner, &ws, self.config)?;
        self.context.transition_to(PipelineStage::Downloaded)?;

        build::extract_builder(self.runner, &ws, self.config)?;
        self.context.transition_to(PipelineStage::Extracted)?;

        build::build_framework(self.runner, &ws, profile, self.config)?;
        self.context.transition_to(PipelineStage::Built)?;

        let artifact =
            packager::package(self.runner, &ws, profile, self.config, &preflight.output_dir)?;
        self.context.transition_to(PipelineStage::Packaged)?;

        ws.remove()?;
        self.workspace = None;
        self.context.transition_to(PipelineStage::Cleaned)?;

        Ok(artifact)
    }
}

/// Describe the step that was running when the pipeline failed in `stage`.
fn next_stage_label(stage: Option<PipelineStage>) -> &'static str {
    match stage {
        Some(PipelineStage::Start) => "profile resolution",
        Some(PipelineStage::ProfileResolved) => "preflight / workspace preparation",
        Some(PipelineStage::WorkspacePrepared) => "download",
        Some(PipelineStage::Downloaded) => "extraction",
        Some(PipelineStage::Extracted) => "framework build",
        Some(PipelineStage::Built) => "packaging",
        Some(PipelineStage::Packaged) => "cleanup",
        Some(PipelineStage::Cleaned) | Some(PipelineStage::Failed) | None => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stage_label() {
        assert_eq!(next_stage_label(Some(PipelineStage::Extracted)), "framework build");
        assert_eq!(next_stage_label(Some(PipelineStage::Built)), "packaging");
        assert_eq!(next_stage_label(None), "unknown");
    }
}
