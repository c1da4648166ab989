//! System configuration types: HTTP server, guardrails, and logging.

use serde::{Deserialize, Serialize};

/// HTTP front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on one chat turn (classification + handler), in seconds.
    pub turn_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            turn_timeout_secs: 300,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Deployment-specific input policy. Structural limits (input length,
/// turn count, loop window) are fixed and not configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailsConfig {
    /// Case-insensitive substrings that make a message inappropriate.
    pub blocked_terms: Vec<String>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for the concierge crates.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Trace => "concierge=trace",
            Self::Debug => "concierge=debug",
            Self::Info => "concierge=info",
            Self::Warn => "concierge=warn",
            Self::Error => "concierge=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
