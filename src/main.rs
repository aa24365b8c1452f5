//! relocpkg - Main entry point
//!
//! Parses the command line, runs the build pipeline as root, and maps the
//! outcome to the process exit code (0 success, 1 any failure).

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;
use tracing::{debug, info};

use relocpkg::cli::Cli;
use relocpkg::{BuildConfig, Pipeline, SystemHost, SystemRunner, logging};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Still exit 1 if stderr is closed
            e.print().ok();
            return ExitCode::from(1);
        }
    };

    logging::init_tracing(cli.verbose);
    info!("relocpkg {} starting up", env!("CARGO_PKG_VERSION"));

    let config = BuildConfig::from_cli(&cli);
    debug!("Build configuration: {:?}", config);

    let runner = SystemRunner;
    let host = SystemHost;
    let mut pipeline = Pipeline::new(&config, &runner, &host);

    match pipeline.run(cli.profile.as_deref()) {
        Ok(artifact) => {
            println!("{}", artifact.path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            if err.wants_usage() {
                eprintln!();
                eprintln!("{}", Cli::usage());
            }
            if let Some(ws) = pipeline.retained_workspace() {
                eprintln!("workspace retained at {}", ws.root().display());
            }
            ExitCode::from(err.exit_code())
        }
    }
}
