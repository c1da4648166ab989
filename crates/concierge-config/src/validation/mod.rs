//! Full configuration validation.
//!
//! Each check pushes a message into a shared list; all violations are
//! reported together in a single `ConfigError`.

mod helpers;


use crate::schema::ConciergeConfig;
use concierge_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ConciergeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range_f64(&mut errors, "llm.temperature", config.llm.temperature, 0.0, 2.0);
    validate_range(&mut errors, "llm.max_tokens", config.llm.max_tokens as u64, 1, 128_000);
    validate_range(&mut errors, "llm.timeout_secs", config.llm.timeout_secs, 1, 600);

    validate_range(&mut errors, "retrieval.top_k", config.retrieval.top_k as u64, 1, 20);
    validate_non_empty(&mut errors, "retrieval.docs_path", &config.retrieval.docs_path);

    validate_range(
        &mut errors,
        "web_search.num_results",
        config.web_search.num_results as u64,
        1,
        10,
    );

    validate_non_empty(&mut errors, "server.host", &config.server.host);
    validate_range(
        &mut errors,
        "server.turn_timeout_secs",
        config.server.turn_timeout_secs,
        1,
        3600,
    );

    for (i, term) in config.guardrails.blocked_terms.iter().enumerate() {
        if term.trim().is_empty() {
            errors.push(format!("guardrails.blocked_terms[{i}] is empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
