use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// relocpkg - Relocatable Python framework packager
#[derive(Parser, Debug)]
#[command(name = "relocpkg")]
#[command(about = "Build a relocatable Python framework and wrap it in a macOS installer package")]
#[command(
    long_about = "Downloads the relocatable-python builder, builds a self-contained Python \
framework with the packages of the chosen profile, and writes an installer package that \
installs it under /Library/ManagedFrameworks/Python. Must be run as root."
)]
#[command(version)]
pub struct Cli {
    /// Package profile to build: minimal or recommended
    #[arg(value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Python version handed to the builder (e.g. 3.11.9)
    #[arg(long, env = "RELOCPKG_PYTHON_VERSION")]
    pub python_version: Option<String>,

    /// URL of the relocatable-python builder zip archive
    #[arg(long, env = "RELOCPKG_BUILDER_URL")]
    pub builder_url: Option<String>,

    /// Fixed workspace directory (removed first if it exists)
    #[arg(long, env = "RELOCPKG_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Directory for the finished package (default: console user's Desktop)
    #[arg(long, env = "RELOCPKG_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable debug logging, including captured tool output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Full help text, printed when the profile argument is missing or invalid.
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}
