//! Ranked web results.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

const SERPAPI_URL: &str = "https://serpapi.com/search";
pub const SERPAPI_KEY_ENV: &str = "SERPAPI_KEY";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebSearchError {
    #[error("web search is not configured: {0}")]
    NotConfigured(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("search API error: {0}")]
    Api(String),
    #[error("could not parse search response: {0}")]
    Parse(String),
}

impl WebSearchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "NotConfigured",
            Self::Network(_) => "Network",
            Self::Api(_) => "Api",
            Self::Parse(_) => "Parse",
        }
    }
}

#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Return at most `num_results` hits, best first. Callers clamp the count
    /// with [`clamp_num_results`].
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, WebSearchError>;
}

/// Clamp a requested result count to 1..=10.
pub fn clamp_num_results(requested: i64) -> usize {
    requested.clamp(1, 10) as usize
}

pub fn format_hits(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No results found for '{query}'.");
    }
    let mut out = format!("Results for '{query}':\n");
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!(
            "\n[{}] {}\n    {}\n    {}\n",
            i + 1,
            hit.title,
            hit.snippet,
            hit.url
        ));
    }
    out
}

/// Google results through SerpAPI.
pub struct SerpApiSearch {
    api_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for SerpApiSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiSearch")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl SerpApiSearch {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WebSearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WebSearchError::Network(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            endpoint: SERPAPI_URL.to_string(),
            http,
        })
    }

    /// Build from `SERPAPI_KEY`; `NotConfigured` if it is unset or blank.
    pub fn from_env() -> Result<Self, WebSearchError> {
        match std::env::var(SERPAPI_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key.trim()),
            _ => Err(WebSearchError::NotConfigured(format!("{SERPAPI_KEY_ENV} is not set"))),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearchProvider for SerpApiSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, WebSearchError> {
        let num = num_results.clamp(1, 10);
        debug!(query, num, "serpapi search");

        let num_param = num.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num_param.as_str()),
                ("engine", "google"),
            ])
            .send()
            .await
            .map_err(|e| WebSearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebSearchError::Api(format!("HTTP {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WebSearchError::Parse(e.to_string()))?;
        parse_organic_results(&body, num)
    }
}

fn parse_organic_results(body: &serde_json::Value, limit: usize) -> Result<Vec<SearchHit>, WebSearchError> {
    if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
        return Err(WebSearchError::Api(error.to_string()));
    }
    let field = |r: &serde_json::Value, key: &str| {
        r.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string()
    };
    let hits = body
        .get("organic_results")
        .and_then(|r| r.as_array())
        .map(|results| {
            results
                .iter()
                .take(limit)
                .map(|r| SearchHit {
                    title: field(r, "title"),
                    snippet: field(r, "snippet"),
                    url: field(r, "link"),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(hits)
}

/// Stand-in used when no search key is available; every call fails with
/// `NotConfigured`.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredSearch;

#[async_trait]
impl WebSearchProvider for UnconfiguredSearch {
    async fn search(&self, _query: &str, _num_results: usize) -> Result<Vec<SearchHit>, WebSearchError> {
        Err(WebSearchError::NotConfigured(format!("{SERPAPI_KEY_ENV} is not set")))
    }
}
