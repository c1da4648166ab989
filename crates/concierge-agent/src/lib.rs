//! Query routing for concierge.
//!
//! Each user turn is screened by the safety filters, labelled by the
//! category classifier, and answered by exactly one category handler, which
//! may make at most one tool round-trip. Conversations are kept per session.

pub mod category;
pub mod classifier;
pub mod encoding;
pub mod error;
pub mod guardrails;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod service;
pub mod session;
pub mod toolbox;

#[cfg(test)]
mod testing;

pub use category::Category;
pub use classifier::{ClassificationResult, Classifier, DecodeMethod, RoutingExplanation};
pub use error::{HandlerError, ToolError};
pub use handlers::{Handler, HandlerOutcome, HandlerRegistry};
pub use orchestrator::{Orchestrator, ProcessResult, ResponseMetadata, Stage};
pub use service::{ConciergeService, History, HistoryEntry};
pub use session::{Conversation, SessionRegistry, SharedConversation};
pub use toolbox::{ToolKind, Toolbox};
