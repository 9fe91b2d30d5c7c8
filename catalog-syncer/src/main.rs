//! Catalog syncer binary.
//!
//! Reads the product catalog file, reconciles it against the products table and exits.
//! A failed run prints a report to stderr and exits with a non-zero status.

use std::process::ExitCode;

use catalog::sync::sync_catalog;
use catalog_config::shared::SyncConfig;
use catalog_telemetry::tracing::init_tracing;
use tracing::info;

use crate::config::load_sync_config;
use crate::error::{SyncerError, SyncerResult};

mod config;
mod error;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", err.render_report());
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration, initializes tracing and runs a single sync on a fresh runtime.
fn run() -> SyncerResult<()> {
    let sync_config = load_sync_config()?;

    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME")).map_err(SyncerError::config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(sync_config))
}

async fn async_main(sync_config: SyncConfig) -> SyncerResult<()> {
    info!(
        source = %sync_config.source.path.display(),
        table = %sync_config.table,
        "starting catalog sync"
    );

    sync_catalog(&sync_config).await?;

    Ok(())
}
