use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use concierge_agent::{Classifier, ConciergeService, HandlerRegistry, Orchestrator, Toolbox};
use concierge_ai::{AiClient, AiError, AiResponse, Message, ToolCall, ToolDefinition};
use concierge_server::http::router;
use concierge_tools::{KeywordIndex, UnconfiguredSearch};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Replies from a fixed queue; optionally sleeps before each reply.
struct QueueClient {
    replies: Mutex<VecDeque<AiResponse>>,
    delay: Duration,
}

impl QueueClient {
    fn new(replies: Vec<AiResponse>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            delay: Duration::ZERO,
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AiClient for QueueClient {
    async fn send_message(
        &self,
        _messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AiError::ApiError("no scripted reply".into()))
    }

    fn model_name(&self) -> &str {
        "queue-model"
    }
}

fn label(category: &str) -> AiResponse {
    AiResponse::text(format!(
        r#"{{"category": "{category}", "confidence": 0.95, "reasoning": "test"}}"#
    ))
}

fn service(classifier: QueueClient, handler: QueueClient) -> ConciergeService {
    let toolbox = Toolbox::new(
        Arc::new(KeywordIndex::new()),
        Arc::new(UnconfiguredSearch),
    );
    ConciergeService::new(Orchestrator::new(
        Classifier::new(Arc::new(classifier)),
        HandlerRegistry::new(Arc::new(handler), toolbox),
        "groq",
    ))
}

fn app(classifier: QueueClient, handler: QueueClient) -> Router {
    router(service(classifier, handler), 30)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_provider_and_model() {
    let (status, body) = send(
        app(QueueClient::new(vec![]), QueueClient::new(vec![])),
        Method::GET,
        "/health",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "groq");
    assert_eq!(body["model"], "queue-model");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn chat_without_message_is_bad_request() {
    let app = app(QueueClient::new(vec![]), QueueClient::new(vec![]));
    let (status, body) = send(app.clone(), Method::POST, "/api/chat", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(app, Method::POST, "/api/chat", Some(json!({"message": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_routes_arithmetic_through_calculator() {
    let handler = QueueClient::new(vec![
        AiResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                name: "calculator".into(),
                arguments: json!({"expression": "2 + 2"}),
            }],
            ..AiResponse::default()
        },
        AiResponse::text("2 + 2 equals 4."),
    ]);
    let (status, body) = send(
        app(QueueClient::new(vec![label("ARITHMETIC")]), handler),
        Method::POST,
        "/api/chat",
        Some(json!({"message": "2 + 2", "session_id": "calc"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["session_id"], "calc");
    let request_id = body["request_id"].as_str().unwrap();
    assert_eq!(request_id.len(), 8);
    assert!(request_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(body["category"], "ARITHMETIC");
    assert!(body["response"].as_str().unwrap().contains('4'));
    assert_eq!(body["metadata"]["handler"], "calculator_agent");
    assert_eq!(body["metadata"]["tools_used"], json!(["calculator"]));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn chat_without_session_gets_fresh_id() {
    let (status, body) = send(
        app(
            QueueClient::new(vec![label("DIRECT")]),
            QueueClient::new(vec![AiResponse::text("Hello there, friend.")]),
        ),
        Method::POST,
        "/api/chat",
        Some(json!({"message": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn oversized_message_is_rejected_in_body() {
    let (status, body) = send(
        app(QueueClient::new(vec![]), QueueClient::new(vec![])),
        Method::POST,
        "/api/chat",
        Some(json!({"message": "x".repeat(10_001), "session_id": "big"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body.get("category").is_none());
}

#[tokio::test]
async fn history_clear_and_sessions() {
    let app = app(
        QueueClient::new(vec![label("DIRECT")]),
        QueueClient::new(vec![AiResponse::text("Nice to meet you, Ana.")]),
    );

    let (status, _) = send(app.clone(), Method::GET, "/api/history/ana", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(app.clone(), Method::POST, "/api/clear/ana", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        app.clone(),
        Method::POST,
        "/api/chat",
        Some(json!({"message": "Hi, I'm Ana", "session_id": "ana"})),
    )
    .await;

    let (status, body) = send(app.clone(), Method::GET, "/api/history/ana", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["llm_calls"], 2);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "Hi, I'm Ana");
    assert_eq!(body["messages"][1]["role"], "assistant");

    let (_, body) = send(app.clone(), Method::GET, "/api/sessions", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["sessions"], json!(["ana"]));

    let (status, _) = send(app.clone(), Method::POST, "/api/clear/ana", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(app, Method::GET, "/api/history/ana", None).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["session_id"], "ana");
}

#[tokio::test]
async fn slow_turn_times_out() {
    let classifier = QueueClient::new(vec![label("DIRECT")]).slow(Duration::from_secs(5));
    let app = router(service(classifier, QueueClient::new(vec![])), 0);
    let (status, body) = send(
        app,
        Method::POST,
        "/api/chat",
        Some(json!({"message": "hello", "session_id": "slow"})),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["success"], false);
}
