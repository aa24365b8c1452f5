//! Type-safe external tool contracts.
//!
//! Every external program the pipeline runs is described by a struct that
//! implements `ToolArgs`. The struct produces the exact argument vector the
//! tool expects, and `CommandSpec` turns it into an owned descriptor the
//! runner executes and logs.
//!
//! # Design Goals
//!
//! 1. **Compile-Time Safety**: flag names live in one `to_cli_args()` impl per tool.
//! 2. **Uniform Execution**: all tools run through `CommandRunner::run`.
//! 3. **Explicit Success**: each tool declares which exit codes count as success.

use std::fmt;

/// Trait for typed tool arguments.
///
/// # Contract
///
/// - `program()`: Absolute path (or name) of the executable.
/// - `to_cli_args()`: Arguments exactly as the tool expects them.
/// - `get_env_vars()`: Extra environment variables for the child.
/// - `success_codes()`: Exit codes treated as success (default `[0]`).
pub trait ToolArgs {
    /// Executable to run.
    fn program(&self) -> String;

    /// Convert struct fields to CLI arguments.
    fn to_cli_args(&self) -> Vec<String>;

    /// Get required environment variables.
    fn get_env_vars(&self) -> Vec<(String, String)> {
        vec![]
    }

    /// Exit codes that mean the tool did its job.
    fn success_codes(&self) -> &'static [i32] {
        &[0]
    }
}

/// Owned description of one external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub success_codes: &'static [i32],
}

impl CommandSpec {
    /// Build a descriptor from typed tool arguments.
    pub fn from_args<T: ToolArgs + ?Sized>(args: &T) -> Self {
        Self {
            program: args.program(),
            args: args.to_cli_args(),
            env: args.get_env_vars(),
            success_codes: args.success_codes(),
        }
    }

    /// Whether an exit code satisfies this command's success predicate.
    ///
    /// `None` (killed by a signal) is never success.
    pub fn is_success(&self, exit_code: Option<i32>) -> bool {
        exit_code.is_some_and(|code| self.success_codes.contains(&code))
    }

    /// Final path component of the program, for log and error context.
    pub fn tool_name(&self) -> &str {
        self.program.rsplit('/').next().unwrap_or(&self.program)
    }

    /// Value following `flag` in the argument vector, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
