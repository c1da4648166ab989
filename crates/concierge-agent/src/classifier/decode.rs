//! Lenient decoding of the classifier's answer.
//!
//! Order: strict JSON (after stripping a markdown fence), then a
//! case-insensitive scan of the raw text for any label, then `DIRECT`.

use serde::Serialize;
use serde_json::Value;

use crate::category::Category;

/// Which decoding step produced the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMethod {
    Structured,
    TextScan,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub category: Category,
    pub confidence: f64,
    pub reasoning: String,
    pub method: DecodeMethod,
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with("```") {
        return text;
    }
    let inner = text.split("```").nth(1).unwrap_or_default();
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

pub fn decode(raw: &str) -> Decoded {
    if let Some(decoded) = decode_structured(strip_code_fence(raw)) {
        return decoded;
    }
    if let Some(category) = scan_for_label(raw) {
        return Decoded {
            category,
            confidence: 0.0,
            reasoning: "label recovered from unstructured response".to_string(),
            method: DecodeMethod::TextScan,
        };
    }
    Decoded {
        category: Category::Direct,
        confidence: 0.0,
        reasoning: "no recognizable category in response".to_string(),
        method: DecodeMethod::Default,
    }
}

/// Strict parse. `None` unless the text is a JSON object whose `category`
/// is one of the five labels.
fn decode_structured(text: &str) -> Option<Decoded> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;
    let category = object
        .get("category")
        .and_then(Value::as_str)
        .and_then(Category::from_label)?;

    Some(Decoded {
        category,
        confidence: object.get("confidence").map(confidence).unwrap_or(0.0),
        reasoning: object
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        method: DecodeMethod::Structured,
    })
}

fn confidence(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    match raw {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// First label found by scan order, not by position in the text.
pub fn scan_for_label(text: &str) -> Option<Category> {
    let upper = text.to_uppercase();
    Category::ALL.into_iter().find(|c| upper.contains(c.label()))
}
