//! External tool execution
//!
//! All external programs run through a `CommandRunner`. The production
//! runner is `SystemRunner`; tests substitute a recording fake.
//!
//! Execution is blocking: `run` returns only after the child exits. No
//! timeout is applied, so a hung tool hangs the pipeline.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::tool_traits::{CommandSpec, ToolArgs};

/// Seam between the pipeline and the processes it launches.
pub trait CommandRunner {
    /// Run `spec` to completion and capture its output.
    ///
    /// Returns `Err` only when the process could not be spawned or waited
    /// on. A non-zero exit is reported through `CommandOutput::success`.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Convenience wrapper for typed tool arguments.
    fn run_tool(&self, args: &dyn ToolArgs) -> Result<CommandOutput> {
        self.run(&CommandSpec::from_args(args))
    }
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        info!(command = %spec, env = ?spec.env, "running external tool");

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to spawn {}", spec.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();
        let success = spec.is_success(exit_code);

        if !stdout.trim().is_empty() {
            debug!(tool = spec.tool_name(), "stdout:\n{}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            debug!(tool = spec.tool_name(), "stderr:\n{}", stderr.trim_end());
        }

        if success {
            info!(tool = spec.tool_name(), "completed successfully");
        } else {
            info!(
                tool = spec.tool_name(),
                "failed with exit code {}",
                exit_code.map_or_else(|| "none (signal)".to_string(), |c| c.to_string())
            );
        }

        Ok(CommandOutput {
            tool: spec.tool_name().to_string(),
            stdout,
            stderr,
            exit_code,
            success,
        })
    }
}

/// Output from an external tool run.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Short tool name the output belongs to.
    pub tool: String,
    /// Standard output from the tool.
    pub stdout: String,
    /// Standard error from the tool.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the exit code satisfied the command's success predicate.
    pub success: bool,
}

impl CommandOutput {
    /// Check if the tool succeeded and return an error if not.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            return Ok(());
        }

        let code = self.exit_code.unwrap_or(-1);
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };

        if detail.is_empty() {
            anyhow::bail!("{} failed ({} exit code {})", context, self.tool, code)
        }
        anyhow::bail!(
            "{} failed ({} exit code {}): {}",
            context,
            self.tool,
            code,
            last_lines(detail, 10)
        )
    }
}

/// Keep the tail of long tool output so error messages stay readable.
fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
