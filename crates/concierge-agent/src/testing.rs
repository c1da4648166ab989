//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use concierge_ai::{AiClient, AiError, AiResponse, Message, ToolCall, ToolDefinition, TokenUsage};
use concierge_tools::{Passage, RetrievalError, RetrievalIndex, SearchHit, WebSearchError, WebSearchProvider};

/// One recorded `send_message` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tools: Vec<String>,
}

/// Replies from a queue, in order. An exhausted script is an API error.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<AiResponse, AiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, content: &str) -> Self {
        self.push(Ok(AiResponse {
            content: content.to_string(),
            tool_calls: Vec::new(),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }))
    }

    pub fn tool_call(self, name: &str, arguments: serde_json::Value) -> Self {
        self.push(Ok(AiResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: format!("call_{name}"),
                name: name.to_string(),
                arguments,
            }],
            usage: TokenUsage::default(),
        }))
    }

    pub fn respond(self, response: AiResponse) -> Self {
        self.push(Ok(response))
    }

    pub fn fail(self, error: AiError) -> Self {
        self.push(Err(error))
    }

    fn push(self, reply: Result<AiResponse, AiError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            tools: tools.iter().map(|t| t.name.clone()).collect(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::ApiError("script exhausted".into())))
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Classifier client answering every query with `label`.
pub fn classifier_reply(label: &str) -> ScriptedClient {
    ScriptedClient::new().reply(&format!(
        r#"{{"category": "{label}", "confidence": 0.9, "reasoning": "scripted"}}"#
    ))
}

pub struct FixedIndex(pub Vec<Passage>);

#[async_trait]
impl RetrievalIndex for FixedIndex {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<Passage>, RetrievalError> {
        Ok(self.0.iter().take(k).cloned().collect())
    }
}

pub struct BrokenIndex;

#[async_trait]
impl RetrievalIndex for BrokenIndex {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<Passage>, RetrievalError> {
        Err(RetrievalError::Unavailable("index offline".into()))
    }
}

pub struct FixedSearch(pub Vec<SearchHit>);

#[async_trait]
impl WebSearchProvider for FixedSearch {
    async fn search(&self, _query: &str, num_results: usize) -> Result<Vec<SearchHit>, WebSearchError> {
        Ok(self.0.iter().take(num_results).cloned().collect())
    }
}
