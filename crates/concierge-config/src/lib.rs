//! Concierge configuration system.
//!
//! TOML-based configuration with validation. Every section uses serde
//! defaults so a partial (or missing) file still yields a working config.
//! Credentials are never stored in the file; they are read from the
//! environment by the crates that need them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use concierge_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ConciergeConfig, GuardrailsConfig, LlmConfig, LlmProvider, LoggingConfig, RetrievalConfig,
    ServerConfig, WebSearchConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use concierge_common::ConfigError;

/// Load config from an explicit path, or from the platform default path.
///
/// An explicit path must exist. The default path is created from the
/// commented template on first run.
pub fn load_config(path: Option<&Path>) -> Result<ConciergeConfig, ConfigError> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            toml_loader::load_from_path(path)
        }
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ConciergeConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
