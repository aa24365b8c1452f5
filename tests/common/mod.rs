//! Shared test doubles for pipeline integration tests.
//!
//! `FakeRunner` records every command and simulates the filesystem effect
//! each real tool would have. `FakeHost` answers the preflight questions.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use relocpkg::config::{BUILDER_SCRIPT, DEFAULT_BUILDER_DIR};
use relocpkg::{CommandOutput, CommandRunner, CommandSpec, HostEnvironment};

/// What the fake saw in the workspace when curl ran.
#[derive(Debug, Clone, Default)]
pub struct FetchObservation {
    pub workspace_entries: Vec<String>,
    pub payload_empty: bool,
}

#[derive(Default)]
pub struct FakeRunner {
    /// Tool name (final path component) that exits non-zero.
    pub fail_tool: Option<&'static str>,
    /// Exit code reported for a successful unzip (0 or 1).
    pub unzip_code: i32,
    /// Builder exits 0 but produces no framework.
    pub builder_produces_nothing: bool,
    /// pkgbuild deletes the workspace out from under the cleanup step.
    pub pkgbuild_removes_workspace: bool,
    pub calls: RefCell<Vec<CommandSpec>>,
    pub requirements_seen: RefCell<Option<String>>,
    pub fetch_observation: RefCell<Option<FetchObservation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(tool: &'static str) -> Self {
        Self {
            fail_tool: Some(tool),
            ..Self::default()
        }
    }

    /// Tool names in invocation order.
    pub fn tool_names(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.tool_name().to_string())
            .collect()
    }

    pub fn call_for(&self, tool: &str) -> Option<CommandSpec> {
        self.calls
            .borrow()
            .iter()
            .find(|c| c.tool_name() == tool)
            .cloned()
    }

    fn ok(spec: &CommandSpec, code: i32) -> CommandOutput {
        CommandOutput {
            tool: spec.tool_name().to_string(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(code),
            success: spec.is_success(Some(code)),
        }
    }

    fn simulate(&self, spec: &CommandSpec) -> anyhow::Result<i32> {
        match spec.tool_name() {
            "curl" => {
                let output = PathBuf::from(spec.flag_value("--output").expect("curl --output"));
                let ws_root = output
                    .parent()
                    .and_then(Path::parent)
                    .expect("archive lives in <ws>/downloads");
                let mut entries: Vec<String> = fs::read_dir(ws_root)?
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect();
                entries.sort();
                let payload_empty = fs::read_dir(ws_root.join("payload"))?.next().is_none();
                *self.fetch_observation.borrow_mut() = Some(FetchObservation {
                    workspace_entries: entries,
                    payload_empty,
                });
                fs::write(output, b"PK\x03\x04")?;
                Ok(0)
            }
            "unzip" => {
                let dest = PathBuf::from(spec.flag_value("-d").expect("unzip -d"));
                let dir = dest.join(DEFAULT_BUILDER_DIR);
                fs::create_dir_all(&dir)?;
                fs::write(dir.join(BUILDER_SCRIPT), "#!/usr/bin/python3\n")?;
                Ok(self.unzip_code)
            }
            BUILDER_SCRIPT => {
                let req = spec.flag_value("--pip-requirements").expect("requirements");
                *self.requirements_seen.borrow_mut() = Some(fs::read_to_string(req)?);
                if !self.builder_produces_nothing {
                    let dest =
                        PathBuf::from(spec.flag_value("--destination").expect("destination"));
                    fs::create_dir_all(dest.join("Python.framework/Versions/Current/bin"))?;
                }
                Ok(0)
            }
            "pkgbuild" => {
                let output = spec.args.last().expect("pkgbuild output");
                fs::write(output, b"xar!")?;
                if self.pkgbuild_removes_workspace {
                    let payload =
                        PathBuf::from(spec.flag_value("--root").expect("pkgbuild --root"));
                    fs::remove_dir_all(payload.parent().expect("payload lives in <ws>"))?;
                }
                Ok(0)
            }
            _ => Ok(0),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());

        if self.fail_tool == Some(spec.tool_name()) {
            return Ok(CommandOutput {
                tool: spec.tool_name().to_string(),
                stdout: String::new(),
                stderr: "simulated failure".to_string(),
                exit_code: Some(1),
                success: false,
            });
        }

        let code = self.simulate(spec)?;
        Ok(Self::ok(spec, code))
    }
}

pub struct FakeHost {
    pub root: bool,
    pub tools_present: bool,
    pub console_user: Option<String>,
    pub home: Option<PathBuf>,
}

impl FakeHost {
    /// Root, all tools present, no console user (tests pass --output-dir).
    pub fn privileged() -> Self {
        Self {
            root: true,
            tools_present: true,
            console_user: None,
            home: None,
        }
    }

    pub fn unprivileged() -> Self {
        Self {
            root: false,
            ..Self::privileged()
        }
    }
}

impl HostEnvironment for FakeHost {
    fn is_privileged(&self) -> bool {
        self.root
    }

    fn has_tool(&self, _path: &str) -> bool {
        self.tools_present
    }

    fn console_user(&self) -> Option<String> {
        self.console_user.clone()
    }

    fn home_dir(&self, _user: &str) -> Option<PathBuf> {
        self.home.clone()
    }
}
