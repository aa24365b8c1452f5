//! Type-safe arguments for the relocatable Python framework builder.

use std::path::PathBuf;

use crate::tool_traits::ToolArgs;

/// Arguments for `make_relocatable_python_framework.py`.
///
/// # Field to Flag Mapping
///
/// | Rust Field          | CLI Flag             | Notes |
/// |---------------------|----------------------|-------|
/// | `python_version`    | `--python-version`   | e.g. `3.11.9` |
/// | `requirements_file` | `--pip-requirements` | Newline-delimited package list |
/// | `destination`       | `--destination`      | Directory that receives `Python.framework` |
///
/// The script is executed directly and relies on its own shebang.
#[derive(Debug, Clone)]
pub struct RelocatablePythonArgs {
    pub script: PathBuf,
    pub python_version: String,
    pub requirements_file: PathBuf,
    pub destination: PathBuf,
}

impl ToolArgs for RelocatablePythonArgs {
    fn program(&self) -> String {
        self.script.display().to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "--python-version".to_string(),
            self.python_version.clone(),
            "--pip-requirements".to_string(),
            self.requirements_file.display().to_string(),
            "--destination".to_string(),
            self.destination.display().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_args() {
        let args = RelocatablePythonArgs {
            script: PathBuf::from("/ws/builder/relocatable-python-main/make_relocatable_python_framework.py"),
            python_version: "3.11.9".to_string(),
            requirements_file: PathBuf::from("/ws/requirements.txt"),
            destination: PathBuf::from("/ws/payload"),
        };

        assert_eq!(
            args.program(),
            "/ws/builder/relocatable-python-main/make_relocatable_python_framework.py"
        );
        assert_eq!(
            args.to_cli_args(),
            vec![
                "--python-version",
                "3.11.9",
                "--pip-requirements",
                "/ws/requirements.txt",
                "--destination",
                "/ws/payload",
            ]
        );
        assert!(args.get_env_vars().is_empty());
    }
}
