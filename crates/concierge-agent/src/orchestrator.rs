//! The routing state machine.
//!
//! `START -> CLASSIFY -> DISPATCH(category) -> END`, once per user turn. No
//! cycles and no retries: a failed handler still reaches `END`, carrying its
//! apology turn.

use concierge_ai::Message;
use concierge_common::ConciergeError;
use serde::Serialize;
use tracing::{info, warn};

use crate::category::Category;
use crate::classifier::{ClassificationResult, Classifier, DecodeMethod};
use crate::guardrails::{self, input::REFUSAL};
use crate::handlers::{HandlerOutcome, HandlerRegistry};
use crate::session::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Classify,
    Dispatch(Category),
    End,
}

impl Stage {
    /// The stage after `self`. `classified` is the classifier's label and is
    /// only consulted when leaving `Classify`.
    pub fn next(self, classified: Option<&str>) -> Stage {
        match self {
            Stage::Start => Stage::Classify,
            Stage::Classify => Stage::Dispatch(Category::resolve(classified)),
            Stage::Dispatch(_) | Stage::End => Stage::End,
        }
    }
}

/// Debugging and analytics data attached to every processed turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetadata {
    pub message_count: usize,
    pub provider: String,
    pub model: String,
    pub handler: String,
    pub handler_ok: bool,
    pub confidence: f64,
    pub reasoning: String,
    pub classification: DecodeMethod,
    pub tools_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl ProcessResult {
    fn rejected(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: response.into(),
            category: None,
            error: Some(error.into()),
            metadata: None,
        }
    }
}

pub struct Orchestrator {
    classifier: Classifier,
    handlers: HandlerRegistry,
    blocked_terms: Vec<String>,
    provider: String,
}

impl Orchestrator {
    pub fn new(
        classifier: Classifier,
        handlers: HandlerRegistry,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            handlers,
            blocked_terms: Vec::new(),
            provider: provider.into(),
        }
    }

    pub fn with_blocked_terms(mut self, terms: Vec<String>) -> Self {
        self.blocked_terms = terms;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        self.handlers.model_name()
    }

    /// Input safety filters. `Ok` carries the sanitized text; `Err` is the
    /// finished rejection result. Touches no state.
    pub fn screen(&self, user_input: &str) -> Result<String, ProcessResult> {
        let check = guardrails::validate_input(user_input);
        let sanitized = match check.sanitized {
            Some(text) if check.valid => text,
            _ => return Err(ProcessResult::rejected(check.message, "input_validation_failed")),
        };

        let verdict = guardrails::check_appropriateness(&sanitized, &self.blocked_terms);
        if !verdict.appropriate {
            return Err(ProcessResult::rejected(REFUSAL, verdict.reason));
        }
        Ok(sanitized)
    }

    /// Screen `user_input`, then route it within `conversation`.
    pub async fn process(&self, conversation: &mut Conversation, user_input: &str) -> ProcessResult {
        match self.screen(user_input) {
            Ok(sanitized) => self.process_screened(conversation, &sanitized).await,
            Err(rejection) => rejection,
        }
    }

    /// Route already-screened input. Always returns a well-formed result.
    pub async fn process_screened(&self, conversation: &mut Conversation, sanitized: &str) -> ProcessResult {
        match self.run(conversation, sanitized).await {
            Ok(result) => result,
            Err(e) => {
                warn!(session_id = %conversation.session_id(), error = %e, "orchestration fault");
                ProcessResult {
                    success: false,
                    response: guardrails::friendly_error(e.kind(), "process_message"),
                    category: None,
                    error: Some(e.to_string()),
                    metadata: None,
                }
            }
        }
    }

    async fn run(&self, conversation: &mut Conversation, sanitized: &str) -> Result<ProcessResult, ConciergeError> {
        let user_turn = Message::user(sanitized);
        let mut history = conversation.turns().to_vec();
        history.push(user_turn.clone());

        let mut stage = Stage::Start;
        let mut classification: Option<ClassificationResult> = None;
        let mut dispatched: Option<(Category, HandlerOutcome)> = None;

        while stage != Stage::End {
            stage = match stage {
                Stage::Start => stage.next(None),
                Stage::Classify => {
                    let result = self.classifier.classify(sanitized).await;
                    let next = stage.next(Some(result.category.label()));
                    classification = Some(result);
                    next
                }
                Stage::Dispatch(category) => {
                    dispatched = Some((category, self.handlers.run(category, &history).await));
                    stage.next(None)
                }
                Stage::End => Stage::End,
            };
        }

        let (Some(classification), Some((category, outcome))) = (classification, dispatched) else {
            return Err(ConciergeError::Orchestration(
                "state machine ended without dispatching".to_string(),
            ));
        };

        conversation.extend(category, std::iter::once(user_turn).chain(outcome.turns.iter().cloned()));
        conversation.tracker_mut().record(&classification.usage);
        conversation.tracker_mut().record(&outcome.usage);

        let turns = conversation.turns();
        let complete = guardrails::ensure_complete_response(turns);
        let mut response = guardrails::validate_output(&complete).processed;

        let length = guardrails::check_length(turns);
        if let Some(warning) = &length.warning {
            response.push_str(&format!("\n\n{warning}"));
        }
        if guardrails::detect_loop(turns) {
            response.push_str(&format!("\n\n{}", guardrails::LOOP_NOTICE));
        }

        info!(
            session_id = %conversation.session_id(),
            category = %category,
            handler = outcome.handler,
            handler_ok = outcome.success,
            turns = length.message_count,
            "turn processed"
        );

        Ok(ProcessResult {
            success: true,
            response,
            category: Some(category),
            error: None,
            metadata: Some(ResponseMetadata {
                message_count: length.message_count,
                provider: self.provider.clone(),
                model: self.handlers.model_name().to_string(),
                handler: outcome.handler.to_string(),
                handler_ok: outcome.success,
                confidence: classification.confidence,
                reasoning: classification.reasoning,
                classification: classification.method,
                tools_used: outcome.tools_used,
            }),
        })
    }
}
