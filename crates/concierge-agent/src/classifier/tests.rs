use std::sync::Arc;

use concierge_ai::{AiError, Role};

use super::*;
use crate::testing::{classifier_reply, ScriptedClient};

#[tokio::test]
async fn classify_reads_structured_answer() {
    let client = Arc::new(classifier_reply("ARITHMETIC"));
    let classifier = Classifier::new(client.clone());

    let result = classifier.classify("2 + 2").await;
    assert_eq!(result.category, Category::Arithmetic);
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.reasoning, "scripted");
    assert_eq!(result.method, DecodeMethod::Structured);
    assert_eq!(result.usage.total_tokens(), 15);
}

#[tokio::test]
async fn classify_sends_one_prompt_without_tools() {
    let client = Arc::new(classifier_reply("DIRECT"));
    let classifier = Classifier::new(client.clone());
    classifier.classify("hello there").await;

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].tools.is_empty());
    assert_eq!(calls[0].messages.len(), 1);
    assert_eq!(calls[0].messages[0].role, Role::User);
    assert!(calls[0].messages[0].content.contains("<query>hello there</query>"));
}

#[tokio::test]
async fn classify_survives_prose_answer() {
    let client = Arc::new(ScriptedClient::new().reply("I'd say this is a web_search question"));
    let result = Classifier::new(client).classify("news today").await;
    assert_eq!(result.category, Category::WebSearch);
    assert_eq!(result.method, DecodeMethod::TextScan);
}

#[tokio::test]
async fn classify_defaults_when_nothing_recognizable() {
    let client = Arc::new(ScriptedClient::new().reply("¯\\_(ツ)_/¯"));
    let result = Classifier::new(client).classify("???").await;
    assert_eq!(result.category, Category::Direct);
    assert_eq!(result.method, DecodeMethod::Default);
}

#[tokio::test]
async fn classify_never_propagates_errors() {
    let client = Arc::new(ScriptedClient::new().fail(AiError::RateLimited));
    let result = Classifier::new(client).classify("2 + 2").await;
    assert_eq!(result.category, Category::Direct);
    assert_eq!(result.confidence, 0.0);
    assert!(result.reasoning.contains("RateLimited"));
}

#[tokio::test]
async fn explain_describes_the_route() {
    let client = Arc::new(classifier_reply("TEMPORAL"));
    let explanation = Classifier::new(client).explain("What time is it?").await;
    assert_eq!(explanation.category, Category::Temporal);
    assert_eq!(explanation.query, "What time is it?");
    assert_eq!(explanation.explanation, Category::Temporal.explanation());
}

#[test]
fn prompt_has_one_example_per_category() {
    let prompt = build_prompt("2 + 2");
    for (i, category) in Category::ALL.iter().enumerate() {
        assert!(prompt.contains(&format!("<example index=\"{i}\">")));
        assert!(prompt.contains(&format!("<category>{}</category>", category.label())));
    }
    assert!(prompt.contains("<task>classify_query</task>"));
    assert!(prompt.contains("<output_schema>"));
}
