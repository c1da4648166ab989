//! Category classifier.
//!
//! One generation call per query, sent as a structured-text prompt with one
//! worked example per category. The answer is decoded leniently (see
//! [`decode`]); the classifier never returns an error.

pub mod decode;

use std::sync::Arc;

use concierge_ai::{AiClient, Message, TokenUsage};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::category::Category;
use crate::encoding::build_structured_prompt;
use crate::prompts::CLASSIFIER_TASK;

pub use decode::{DecodeMethod, Decoded};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    /// In `[0, 1]`. Observability only; routing ignores it.
    pub confidence: f64,
    pub reasoning: String,
    pub method: DecodeMethod,
    #[serde(skip)]
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingExplanation {
    pub category: Category,
    pub query: String,
    pub explanation: String,
}

/// Classifies queries through a generation client.
///
/// The client should be configured with temperature 0.
pub struct Classifier {
    client: Arc<dyn AiClient>,
}

impl Classifier {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    pub async fn classify(&self, query: &str) -> ClassificationResult {
        let prompt = build_prompt(query);

        let response = match self.client.send_message(&[Message::user(prompt)], &[]).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "classification call failed, using DIRECT");
                return ClassificationResult {
                    category: Category::Direct,
                    confidence: 0.0,
                    reasoning: format!("classification failed: {}", e.kind()),
                    method: DecodeMethod::Default,
                    usage: TokenUsage::default(),
                };
            }
        };

        let decoded = decode::decode(&response.content);
        match decoded.method {
            DecodeMethod::Structured => info!(
                category = %decoded.category,
                confidence = decoded.confidence,
                reasoning = %decoded.reasoning,
                "query classified"
            ),
            method => {
                let raw: String = response.content.chars().take(200).collect();
                warn!(
                    category = %decoded.category,
                    method = ?method,
                    raw = %raw,
                    "classifier response was not valid structured output"
                );
            }
        }

        ClassificationResult {
            category: decoded.category,
            confidence: decoded.confidence,
            reasoning: decoded.reasoning,
            method: decoded.method,
            usage: response.usage,
        }
    }

    /// Classify and describe what the system will do with the query.
    pub async fn explain(&self, query: &str) -> RoutingExplanation {
        let result = self.classify(query).await;
        RoutingExplanation {
            category: result.category,
            query: query.to_string(),
            explanation: result.category.explanation().to_string(),
        }
    }
}

/// The full classification prompt for `query`.
pub fn build_prompt(query: &str) -> String {
    let input = json!({
        "query": query,
        "task": "classify_query",
    });
    let output_schema = json!({
        "category": "string (ARITHMETIC|RETRIEVAL|WEB_SEARCH|TEMPORAL|DIRECT)",
        "confidence": "float (0.0-1.0)",
        "reasoning": "string (brief explanation)",
    });
    build_structured_prompt(CLASSIFIER_TASK, &input, &output_schema, &worked_examples())
}

fn worked_examples() -> Vec<Value> {
    [
        ("Calculate 128 * 46", Category::Arithmetic, 0.98, "Mathematical operation detected"),
        ("Tell me about LLMs", Category::Retrieval, 0.95, "Technical topic in knowledge base"),
        (
            "Latest news about AI today",
            Category::WebSearch,
            0.93,
            "Needs current information from the web",
        ),
        ("What time is it?", Category::Temporal, 0.99, "Temporal information request"),
        ("Who was Einstein?", Category::Direct, 0.90, "General knowledge question"),
    ]
    .into_iter()
    .map(|(query, category, confidence, reasoning)| {
        json!({
            "input": {"query": query},
            "output": {
                "category": category.label(),
                "confidence": confidence,
                "reasoning": reasoning,
            },
        })
    })
    .collect()
}

#[cfg(test)]
mod tests;
