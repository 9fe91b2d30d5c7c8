use catalog_config::load_config;
use catalog_config::shared::SyncConfig;

use crate::error::{SyncerError, SyncerResult};

/// Loads and validates the sync configuration.
///
/// Layers configuration files, `APP_` variables and the `PG*` connection variables
/// through [`catalog_config::load_config`], which also reads a `.env` file from the
/// working directory when one exists.
pub fn load_sync_config() -> SyncerResult<SyncConfig> {
    let config = load_config::<SyncConfig>().map_err(SyncerError::config)?;
    config.validate().map_err(SyncerError::config)?;

    Ok(config)
}
