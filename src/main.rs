// This is the primary entry point for the AVIF optimizer.
// The lib.rs file serves as the public API used here and by the integration tests.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use avif_optimizer_lib::{AppState, RunConfig, compress_directory};

fn main() -> ExitCode {
    let max_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)          // Keep colored output
        .with_writer(std::io::stdout)
        .compact()                // Use compact formatter instead of pretty
        .init();

    info!("=== AVIF optimizer starting ===");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let state = AppState::new().context("failed to initialise the AVIF encoder")?;
    let config = RunConfig::default();

    runtime.block_on(async {
        compress_directory(&config, state.transcoder())
            .await
            .with_context(|| format!("compression run over '{}' failed", config.input_dir.display()))
    })?;

    Ok(())
}
