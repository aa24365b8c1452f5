//! Pipeline Stage Machine
//!
//! `PipelineContext` is the single source of truth for how far a run got.
//! Only forward transitions to the immediately following stage are allowed,
//! so a stage cannot run before the one it depends on.
//!
//! # Stage Flow
//!
//! ```text
//! Start
//!     ↓
//! ProfileResolved
//!     ↓
//! WorkspacePrepared
//!     ↓
//! Downloaded
//!     ↓
//! Extracted
//!     ↓
//! Built
//!     ↓
//! Packaged
//!     ↓
//! Cleaned
//!
//! (Any non-terminal stage can transition to Failed)
//! ```

use std::fmt;
use thiserror::Error;
use tracing::info;

/// Pipeline stages in sequential order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PipelineStage {
    /// Nothing has run yet
    Start = 0,

    /// Profile token resolved to a package list
    ProfileResolved = 1,

    /// Workspace cleared and role directories created
    WorkspacePrepared = 2,

    /// Builder archive downloaded
    Downloaded = 3,

    /// Builder archive extracted
    Extracted = 4,

    /// Relocatable framework built into the payload
    Built = 5,

    /// Installer package written
    Packaged = 6,

    /// Workspace removed (terminal success)
    Cleaned = 7,

    /// Run aborted (terminal failure)
    Failed = 255,
}

impl PipelineStage {
    #[inline]
    pub const fn order(self) -> u8 {
        self as u8
    }

    /// Returns true if this is a terminal state (Cleaned or Failed)
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleaned | Self::Failed)
    }

    /// Returns the next stage in the sequence, or None if at a terminal state
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::ProfileResolved),
            Self::ProfileResolved => Some(Self::WorkspacePrepared),
            Self::WorkspacePrepared => Some(Self::Downloaded),
            Self::Downloaded => Some(Self::Extracted),
            Self::Extracted => Some(Self::Built),
            Self::Built => Some(Self::Packaged),
            Self::Packaged => Some(Self::Cleaned),
            Self::Cleaned | Self::Failed => None,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "Not started",
            Self::ProfileResolved => "Profile resolved",
            Self::WorkspacePrepared => "Workspace prepared",
            Self::Downloaded => "Builder downloaded",
            Self::Extracted => "Builder extracted",
            Self::Built => "Framework built",
            Self::Packaged => "Package written",
            Self::Cleaned => "Workspace cleaned",
            Self::Failed => "Build failed",
        }
    }

    /// Returns all stages in order (excluding Failed)
    pub const fn all_stages() -> &'static [Self] {
        &[
            Self::Start,
            Self::ProfileResolved,
            Self::WorkspacePrepared,
            Self::Downloaded,
            Self::Extracted,
            Self::Built,
            Self::Packaged,
            Self::Cleaned,
        ]
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during stage transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot skip from {from} to {to}")]
    SkippedStage {
        from: PipelineStage,
        to: PipelineStage,
    },

    #[error("Cannot go backwards from {from} to {to}")]
    BackwardTransition {
        from: PipelineStage,
        to: PipelineStage,
    },

    #[error("Cannot transition from terminal state {from}")]
    FromTerminalState { from: PipelineStage },

    #[error("Already at stage {stage}")]
    AlreadyAtStage { stage: PipelineStage },
}

/// Tracks the current stage of one run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    current: PipelineStage,
    failed_at: Option<PipelineStage>,
    /// (stage, unix timestamp) for every transition taken
    stage_history: Vec<(PipelineStage, u64)>,
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineContext {
    pub fn new() -> Self {
        Self {
            current: PipelineStage::Start,
            failed_at: None,
            stage_history: Vec::with_capacity(PipelineStage::all_stages().len()),
        }
    }

    #[inline]
    pub fn current_stage(&self) -> PipelineStage {
        self.current
    }

    /// Stage that was current when `fail()` was called
    #[inline]
    pub fn failed_at(&self) -> Option<PipelineStage> {
        self.failed_at
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current == PipelineStage::Cleaned
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.current == PipelineStage::Failed
    }

    pub fn stage_history(&self) -> &[(PipelineStage, u64)] {
        &self.stage_history
    }

    /// Transition to `target`, which must be the immediate next stage.
    ///
    /// # Errors
    ///
    /// - `FromTerminalState` if current is Cleaned or Failed
    /// - `AlreadyAtStage` if target is the current stage
    /// - `BackwardTransition` if target is before current
    /// - `SkippedStage` if target is not the immediate next stage
    pub fn transition_to(
        &mut self,
        target: PipelineStage,
    ) -> Result<PipelineStage, TransitionError> {
        if self.current.is_terminal() {
            return Err(TransitionError::FromTerminalState { from: self.current });
        }

        if target == self.current {
            return Err(TransitionError::AlreadyAtStage { stage: target });
        }

        // Failed is reached through fail() only
        if target == PipelineStage::Failed {
            return Err(TransitionError::SkippedStage {
                from: self.current,
                to: target,
            });
        }

        if target.order() < self.current.order() {
            return Err(TransitionError::BackwardTransition {
                from: self.current,
                to: target,
            });
        }

        if self.current.next() != Some(target) {
            return Err(TransitionError::SkippedStage {
                from: self.current,
                to: target,
            });
        }

        info!("Stage: {}", target);
        self.record_stage_transition(target);
        self.current = target;

        Ok(target)
    }

    /// Mark the run as failed, remembering the stage it failed in.
    ///
    /// # Errors
    ///
    /// - `FromTerminalState` if already at Cleaned or Failed
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        if self.current.is_terminal() {
            return Err(TransitionError::FromTerminalState { from: self.current });
        }

        self.failed_at = Some(self.current);
        self.record_stage_transition(PipelineStage::Failed);
        self.current = PipelineStage::Failed;

        Ok(())
    }

    fn record_stage_transition(&mut self, stage: PipelineStage) {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.stage_history.push((stage, timestamp));
    }
}

impl From<TransitionError> for crate::error::PipelineError {
    fn from(err: TransitionError) -> Self {
        crate::error::PipelineError::Transition(err.to_string())
    }
}
