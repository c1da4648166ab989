//! Chat Completions client struct, request building, and response parsing.

use std::time::Duration;

use crate::tools::to_openai_tool;
use crate::{AiError, AiResponse, Message, Role, TokenUsage, ToolCall, ToolDefinition};

use super::config::OpenAiConfig;

/// Chat Completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the JSON request body.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let msgs: Vec<serde_json::Value> = messages.iter().map(message_to_wire).collect();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": msgs,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_openai_tool).collect();
            body["tools"] = serde_json::json!(tool_defs);
            body["tool_choice"] = serde_json::json!("auto");
        }

        body
    }

    /// Parse a non-streaming response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let message = json["choices"]
            .get(0)
            .map(|choice| &choice["message"])
            .ok_or_else(|| AiError::ParseError("response has no choices".into()))?;

        let content = message["content"].as_str().unwrap_or_default().to_string();

        let tool_calls = message["tool_calls"]
            .as_array()
            .map(|calls| calls.iter().map(parse_tool_call).collect())
            .unwrap_or_default();

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(AiResponse {
            content,
            tool_calls,
            usage,
        })
    }
}

fn message_to_wire(msg: &Message) -> serde_json::Value {
    let mut wire = serde_json::json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    });

    if msg.role == Role::Assistant && msg.has_tool_calls() {
        let calls: Vec<_> = msg
            .tool_calls
            .iter()
            .map(|call| {
                serde_json::json!({
                    "id": call.id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments.to_string(),
                    },
                })
            })
            .collect();
        wire["tool_calls"] = serde_json::json!(calls);
    }

    if let Some(ref id) = msg.tool_call_id {
        wire["tool_call_id"] = serde_json::json!(id);
    }

    wire
}

/// Function arguments arrive as a JSON-encoded string. Unparseable
/// arguments are kept as the raw string so the executor can report them.
fn parse_tool_call(call: &serde_json::Value) -> ToolCall {
    let raw_args = call["function"]["arguments"].as_str().unwrap_or("{}");
    let arguments = serde_json::from_str(raw_args)
        .unwrap_or_else(|_| serde_json::Value::String(raw_args.to_string()));
    ToolCall {
        id: call["id"].as_str().unwrap_or("").to_string(),
        name: call["function"]["name"].as_str().unwrap_or("").to_string(),
        arguments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> OpenAiClient {
        OpenAiClient::new(OpenAiConfig::new("k", "https://example.test/v1", "test-model")).unwrap()
    }

    #[test]
    fn request_body_without_tools_has_no_tools_key() {
        let body = client().build_request_body(&[Message::user("hello")], &[]);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn request_body_encodes_tool_round_trip_messages() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "calculator".into(),
            arguments: json!({"expression": "2 + 2"}),
        };
        let messages = vec![
            Message::system("sys"),
            Message::user("2 + 2"),
            Message::assistant_tool_request("", vec![call]),
            Message::tool_result("call_1", "4"),
        ];
        let tools = vec![ToolDefinition {
            name: "calculator".into(),
            description: "math".into(),
            parameters: json!({"type": "object"}),
        }];

        let body = client().build_request_body(&messages, &tools);
        let wire = &body["messages"];
        assert_eq!(wire[0]["role"], "system");
        assert_eq!(wire[2]["tool_calls"][0]["function"]["name"], "calculator");
        assert_eq!(
            wire[2]["tool_calls"][0]["function"]["arguments"],
            "{\"expression\":\"2 + 2\"}"
        );
        assert_eq!(wire[3]["role"], "tool");
        assert_eq!(wire[3]["tool_call_id"], "call_1");
        assert_eq!(body["tools"][0]["type"], "function");
    }

    #[test]
    fn parse_text_response() {
        let resp = client()
            .parse_response(json!({
                "choices": [{"message": {"role": "assistant", "content": "Hello!"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3}
            }))
            .unwrap();
        assert_eq!(resp.content, "Hello!");
        assert!(resp.tool_calls.is_empty());
        assert_eq!(resp.usage.total_tokens(), 15);
    }

    #[test]
    fn parse_tool_call_response() {
        let resp = client()
            .parse_response(json!({
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "web_search", "arguments": "{\"query\":\"rust\"}"}
                    }]
                }}]
            }))
            .unwrap();
        assert_eq!(resp.content, "");
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].id, "call_9");
        assert_eq!(resp.tool_calls[0].arguments["query"], "rust");
    }

    #[test]
    fn malformed_arguments_are_kept_raw() {
        let call = parse_tool_call(&json!({
            "id": "x",
            "function": {"name": "calculator", "arguments": "{not json"}
        }));
        assert_eq!(call.arguments, json!("{not json"));
    }

    #[test]
    fn missing_choices_is_parse_error() {
        let err = client().parse_response(json!({"error": "boom"})).unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }
}
