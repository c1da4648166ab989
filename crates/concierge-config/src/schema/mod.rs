//! Configuration schema types for concierge.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod llm;
mod services;
mod system;

pub use llm::*;
pub use services::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConciergeConfig {
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub web_search: WebSearchConfig,
    pub server: ServerConfig,
    pub guardrails: GuardrailsConfig,
    pub logging: LoggingConfig,
}
