//! Tests for the relocpkg binary
//!
//! These run the compiled binary and check exit codes and messages. None of
//! them reach the fetch stage: either the profile is rejected, or preflight
//! fails (not root, or no pkgbuild on the test host).

use std::process::Command;

fn relocpkg() -> Command {
    Command::new(env!("CARGO_BIN_EXE_relocpkg"))
}

#[test]
fn test_no_profile_prints_usage_and_exits_one() {
    let output = relocpkg().output().expect("binary should run");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no profile given"));
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_unknown_profile_prints_usage_and_exits_one() {
    let output = relocpkg().arg("everything").output().expect("binary should run");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'everything' is not a known profile"));
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_unknown_flag_exits_one() {
    let output = relocpkg()
        .args(["--no-such-flag", "minimal"])
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_zero() {
    let output = relocpkg().arg("--help").output().expect("binary should run");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("PROFILE"));
}

#[test]
fn test_preflight_failure_creates_no_workspace() {
    // Without root (or without pkgbuild on non-macOS hosts) preflight fails.
    if std::path::Path::new("/usr/bin/pkgbuild").exists() && nix::unistd::geteuid().is_root() {
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    let output = relocpkg()
        .arg("--workspace")
        .arg(&ws)
        .arg("--output-dir")
        .arg(tmp.path())
        .arg("minimal")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(!ws.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Permission error") || stderr.contains("Missing required tools"));
}
