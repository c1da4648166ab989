//! Configuration for the external collaborators: retrieval and web search.

use serde::{Deserialize, Serialize};

/// Knowledge-base retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Directory walked for `.txt` / `.md` documents at startup.
    pub docs_path: String,
    /// Passages returned when the model does not ask for a specific count.
    pub top_k: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            docs_path: "./docs".to_string(),
            top_k: 3,
        }
    }
}

/// Web search configuration. The SerpAPI key comes from `SERPAPI_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub enabled: bool,
    /// Default result count (valid range: 1-10).
    pub num_results: u32,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_results: 5,
        }
    }
}
