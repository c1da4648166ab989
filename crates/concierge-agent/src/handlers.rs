//! One execution strategy per category.
//!
//! Every handler has the same shape: system instruction plus history, one
//! generation call offering the category's tools, and at most one tool
//! round-trip followed by a second generation call without tools. A second
//! tool request is never honored.

use std::sync::Arc;

use concierge_ai::{AiClient, Message, TokenUsage, ToolDefinition};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::error::HandlerError;
use crate::guardrails::friendly_error;
use crate::prompts::handler_instruction;
use crate::toolbox::{ToolKind, Toolbox};

pub struct Handler {
    category: Category,
    instruction: String,
    tools: Vec<ToolKind>,
    definitions: Vec<ToolDefinition>,
}

impl Handler {
    fn new(category: Category) -> Self {
        let tools = match category {
            Category::Arithmetic => vec![ToolKind::Calculator],
            Category::Retrieval => vec![ToolKind::SearchKnowledgeBase],
            Category::WebSearch => vec![ToolKind::WebSearch],
            Category::Temporal => vec![ToolKind::CurrentDatetime, ToolKind::DateDifference],
            Category::Direct => Vec::new(),
        };
        Self {
            category,
            instruction: handler_instruction(category),
            definitions: tools.iter().map(ToolKind::definition).collect(),
            tools,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &'static str {
        self.category.handler_name()
    }

    pub fn tools(&self) -> &[ToolKind] {
        &self.tools
    }
}

/// What a handler produced for one user turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerOutcome {
    pub handler: &'static str,
    /// Assistant and tool turns, in order. On failure, a single apology turn.
    pub turns: Vec<Message>,
    pub success: bool,
    pub tools_used: Vec<String>,
    /// Kind of the fault absorbed into the apology, if any.
    pub error_kind: Option<&'static str>,
    #[serde(skip)]
    pub usage: TokenUsage,
}

pub struct HandlerRegistry {
    client: Arc<dyn AiClient>,
    toolbox: Toolbox,
    handlers: Vec<Handler>,
}

impl HandlerRegistry {
    pub fn new(client: Arc<dyn AiClient>, toolbox: Toolbox) -> Self {
        Self {
            client,
            toolbox,
            handlers: Category::ALL.into_iter().map(Handler::new).collect(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn handler(&self, category: Category) -> &Handler {
        // `handlers` is built from `Category::ALL`, in the same order.
        let index = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(Category::ALL.len() - 1);
        &self.handlers[index]
    }

    /// Run the handler for `category` over `history` (which ends with the
    /// new user turn). Never fails: faults become an apology turn.
    pub async fn run(&self, category: Category, history: &[Message]) -> HandlerOutcome {
        let handler = self.handler(category);
        let mut usage = TokenUsage::default();
        let mut tools_used = Vec::new();

        match self.execute(handler, history, &mut usage, &mut tools_used).await {
            Ok(turns) => {
                info!(
                    handler = handler.name(),
                    turns = turns.len(),
                    tools = ?tools_used,
                    "handler finished"
                );
                HandlerOutcome {
                    handler: handler.name(),
                    turns,
                    success: true,
                    tools_used,
                    error_kind: None,
                    usage,
                }
            }
            Err(e) => {
                warn!(handler = handler.name(), kind = e.kind(), error = %e, "handler failed");
                HandlerOutcome {
                    handler: handler.name(),
                    turns: vec![Message::assistant(friendly_error(e.kind(), handler.name()))],
                    success: false,
                    tools_used,
                    error_kind: Some(e.kind()),
                    usage,
                }
            }
        }
    }

    async fn execute(
        &self,
        handler: &Handler,
        history: &[Message],
        usage: &mut TokenUsage,
        tools_used: &mut Vec<String>,
    ) -> Result<Vec<Message>, HandlerError> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(Message::system(handler.instruction.clone()));
        messages.extend_from_slice(history);

        let first = self.client.send_message(&messages, &handler.definitions).await?;
        add_usage(usage, &first.usage);

        if handler.tools.is_empty() {
            return Ok(vec![Message::assistant(first.content)]);
        }
        let Some(call) = first.tool_calls.into_iter().next() else {
            return Ok(vec![Message::assistant(first.content)]);
        };

        debug!(handler = handler.name(), tool = %call.name, "tool requested");
        tools_used.push(call.name.clone());

        let result = match self.toolbox.execute(&call, &handler.tools).await {
            Ok(text) => text,
            Err(e) if e.is_domain_error() => {
                debug!(tool = %call.name, error = %e, "tool reported a domain error");
                format!("Error: {e}")
            }
            Err(e) => return Err(e.into()),
        };

        let request = Message::assistant_tool_request(first.content, vec![call.clone()]);
        let tool_turn = Message::tool_result(call.id, result);
        messages.push(request.clone());
        messages.push(tool_turn.clone());

        let second = self.client.send_message(&messages, &[]).await?;
        add_usage(usage, &second.usage);
        if !second.tool_calls.is_empty() {
            debug!(handler = handler.name(), "ignoring second tool request");
        }

        Ok(vec![request, tool_turn, Message::assistant(second.content)])
    }
}

fn add_usage(total: &mut TokenUsage, usage: &TokenUsage) {
    total.input_tokens = total.input_tokens.saturating_add(usage.input_tokens);
    total.output_tokens = total.output_tokens.saturating_add(usage.output_tokens);
}
