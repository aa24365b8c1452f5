//! Tests for external tool execution
//!
//! These verify that typed tool arguments reach a real child process
//! unchanged through `SystemRunner`, and that exit codes are judged by each
//! tool's success predicate.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use relocpkg::tools::build::RelocatablePythonArgs;
use relocpkg::{CommandOutput, CommandRunner, CommandSpec, SystemRunner, ToolArgs};

/// Write an executable shell script standing in for an external tool.
fn stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// =============================================================================
// Builder Invocation
// =============================================================================

#[test]
fn test_builder_receives_typed_flags() {
    let tmp = tempfile::tempdir().unwrap();
    let script = stub_tool(
        tmp.path(),
        "make_relocatable_python_framework.py",
        "printf '%s\\n' \"$@\"",
    );

    let args = RelocatablePythonArgs {
        script,
        python_version: "3.11.9".to_string(),
        requirements_file: tmp.path().join("requirements.txt"),
        destination: tmp.path().join("payload"),
    };
    let output = SystemRunner.run_tool(&args).expect("stub should spawn");

    assert!(output.success);
    let received: Vec<&str> = output.stdout.lines().collect();
    assert_eq!(received, args.to_cli_args());
}

#[test]
fn test_builder_failure_is_reported_not_raised() {
    let tmp = tempfile::tempdir().unwrap();
    let script = stub_tool(
        tmp.path(),
        "make_relocatable_python_framework.py",
        "echo 'ERROR: Could not find a version that satisfies the requirement' >&2\nexit 1",
    );

    let args = RelocatablePythonArgs {
        script,
        python_version: "3.11.9".to_string(),
        requirements_file: tmp.path().join("requirements.txt"),
        destination: tmp.path().join("payload"),
    };
    let output = SystemRunner.run_tool(&args).expect("stub should spawn");

    assert!(!output.success);
    assert_eq!(output.exit_code, Some(1));
    let err = output.ensure_success("framework build").unwrap_err();
    assert!(err.to_string().contains("satisfies the requirement"));
}

// =============================================================================
// Success Predicates
// =============================================================================

struct Stub {
    path: PathBuf,
    codes: &'static [i32],
}

impl ToolArgs for Stub {
    fn program(&self) -> String {
        self.path.display().to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![]
    }

    fn success_codes(&self) -> &'static [i32] {
        self.codes
    }
}

#[test]
fn test_custom_success_codes_apply_to_real_exit() {
    let tmp = tempfile::tempdir().unwrap();
    let path = stub_tool(tmp.path(), "warns", "exit 1");

    let lenient = SystemRunner
        .run_tool(&Stub { path: path.clone(), codes: &[0, 1] })
        .unwrap();
    assert!(lenient.success);

    let strict = SystemRunner.run_tool(&Stub { path, codes: &[0] }).unwrap();
    assert!(!strict.success);
}

#[test]
fn test_signal_termination_is_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let path = stub_tool(tmp.path(), "killed", "kill -9 $$");

    let output = SystemRunner.run_tool(&Stub { path, codes: &[0] }).unwrap();
    assert!(!output.success);
    assert!(output.exit_code.is_none());
}

#[test]
fn test_spec_env_reaches_child() {
    let tmp = tempfile::tempdir().unwrap();
    let path = stub_tool(tmp.path(), "envcheck", "printf '%s' \"$PIP_NO_CACHE_DIR\"");

    let mut spec = CommandSpec::from_args(&Stub { path, codes: &[0] });
    spec.env.push(("PIP_NO_CACHE_DIR".to_string(), "1".to_string()));
    let output: CommandOutput = SystemRunner.run(&spec).unwrap();
    assert_eq!(output.stdout, "1");
}
