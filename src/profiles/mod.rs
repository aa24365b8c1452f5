//! Package profile selection.
//!
//! A profile names a curated, ordered set of pip packages that is baked into
//! the relocatable framework. Lists live in Rust so the requirements file a
//! run writes is reproducible and testable without running the builder.
//!
//! # Supported Profiles
//!
//! | Profile       | Contents |
//! |---------------|----------|
//! | `minimal`     | PyObjC plus the small helpers most admin scripts import |
//! | `recommended` | Minimal plus HTTP, crypto and Dock tooling |

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{PipelineError, Result};

/// Package profile selected on the command line.
///
/// Parsing is an exact, case-sensitive match on the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Profile {
    /// Bare framework with the packages macOS management scripts rely on.
    Minimal,

    /// Everything in minimal plus commonly used third-party libraries.
    Recommended,
}

impl Profile {
    /// Get the pip packages for this profile, in requirements-file order.
    pub fn packages(&self) -> &'static [&'static str] {
        match self {
            Profile::Minimal => &["pyobjc", "six", "xattr"],

            Profile::Recommended => &[
                "asn1crypto",
                "certifi",
                "cffi",
                "cryptography",
                "docklib",
                "pyobjc",
                "requests",
                "six",
                "urllib3",
                "xattr",
            ],
        }
    }

    /// Render the newline-delimited pip requirements file for this profile.
    pub fn requirements(&self) -> String {
        let mut out = String::new();
        for package in self.packages() {
            out.push_str(package);
            out.push('\n');
        }
        out
    }

    /// Get a human-readable description of the profile.
    pub fn description(&self) -> &'static str {
        match self {
            Profile::Minimal => "Framework with PyObjC, six and xattr",
            Profile::Recommended => "Framework with the recommended admin package set",
        }
    }

    /// Comma-separated list of valid profile names, for help and error text.
    pub fn valid_names() -> String {
        Profile::iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Resolve a command-line token to a profile.
///
/// A missing token is the same error as an unknown one. No side effects.
pub fn resolve(token: Option<&str>) -> Result<Profile> {
    let Some(token) = token else {
        return Err(PipelineError::InvalidProfile { given: None });
    };

    token
        .parse::<Profile>()
        .map_err(|_| PipelineError::InvalidProfile {
            given: Some(token.to_string()),
        })
}
