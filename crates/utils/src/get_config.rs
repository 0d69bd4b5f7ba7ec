use std::path::Path;

use anyhow::{Context, Result};
use cpm_core::{CONFIG_FILE_NAME, Config};
use tokio::fs::{read_to_string, try_exists};
use tracing::debug;

/// Loads `.cpm-migrate.json` from `dir`, falling back to the default configuration when
/// the file does not exist.
pub async fn get_config(dir: &Path) -> Result<Config> {
    let config_file = dir.join(CONFIG_FILE_NAME);
    if !try_exists(&config_file).await? {
        debug!("No configuration file, using defaults");
        return Ok(Config::default());
    }
    let config_json = read_to_string(&config_file)
        .await
        .with_context(|| format!("Failed to read {}", config_file.display()))?;
    serde_json::from_str(&config_json)
        .with_context(|| format!("Invalid configuration in {}", config_file.display()))
}
