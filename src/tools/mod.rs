//! Type-safe argument structs for the external tools.
//!
//! Each struct maps Rust fields to the exact CLI flags the corresponding
//! program expects. Programs are invoked by absolute path so the run does
//! not depend on the caller's `PATH`.

pub mod build;
pub mod fetch;
pub mod package;
pub mod system;

/// `curl`, used to download the builder archive.
pub const CURL: &str = "/usr/bin/curl";

/// `unzip`, used to extract the builder archive.
pub const UNZIP: &str = "/usr/bin/unzip";

/// `chown`, used to hand the payload to root.
pub const CHOWN: &str = "/usr/sbin/chown";

/// `pkgbuild`, the macOS component package builder.
pub const PKGBUILD: &str = "/usr/bin/pkgbuild";

/// `stat`, used for the console user lookup.
pub const STAT: &str = "/usr/bin/stat";

/// Tools that must exist before the pipeline touches the filesystem.
pub const REQUIRED_TOOLS: &[&str] = &[CURL, UNZIP, CHOWN, PKGBUILD, STAT];
