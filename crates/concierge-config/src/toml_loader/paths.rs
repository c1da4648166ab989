//! Where the config file lives, and first-run creation of it.

use std::io;
use std::path::{Path, PathBuf};

use concierge_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "concierge";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/concierge/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config_toml())
    };
    write().map_err(|e| {
        ConfigError::ParseError(format!("failed to write default config to {}: {e}", path.display()))
    })?;

    info!(path = %path.display(), "created default config");
    Ok(())
}
