// Entry point for the Gatling recorder launcher.
//
// Parses the command line, sets up logging, then forks the recorder JVM and
// waits for it. Exit status is 0 when the recorder exits cleanly, 1 otherwise.

use clap::Parser;
use launcher_common::constants::return_code;
use launcher_sdk::build_constants::{LauncherPackage, Source};
use launcher_sdk::trace::TracingTraceWriter;
use recorder_launcher::{RecorderCommand, RecorderLauncher};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let command = RecorderCommand::parse();
    init_tracing(command.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to build Tokio runtime: {e}");
            return ExitCode::from(return_code::FAILURE);
        }
    };

    ExitCode::from(runtime.block_on(run(command)))
}

/// `RUST_LOG` is honoured unless `--verbose` forces debug output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(command: RecorderCommand) -> u8 {
    tracing::info!("Gatling recorder launcher starting.");
    tracing::debug!("  Version = {}", LauncherPackage::VERSION);
    tracing::debug!("  Commit  = {}", Source::COMMIT_HASH);

    let launcher = RecorderLauncher::new(command, Arc::new(TracingTraceWriter));
    match launcher.execute().await {
        Ok(()) => {
            tracing::info!("Recorder exited.");
            return_code::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}: {:#}", e.inner());
            return_code::FAILURE
        }
    }
}
