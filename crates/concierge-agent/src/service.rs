//! Caller-facing surface: send a message, read or clear a session's history,
//! list sessions. Owns the session registry and the orchestrator.

use std::path::Path;
use std::sync::Arc;

use concierge_ai::{AiClient, AiError, OpenAiClient, OpenAiConfig, Role, TokenUsage};
use concierge_common::{ConciergeError, ConfigError, SessionId};
use concierge_config::ConciergeConfig;
use concierge_tools::{
    KeywordIndex, RetrievalError, RetrievalIndex, SerpApiSearch, UnconfiguredSearch, WebSearchProvider,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::category::Category;
use crate::classifier::{Classifier, RoutingExplanation};
use crate::handlers::HandlerRegistry;
use crate::orchestrator::{Orchestrator, ProcessResult};
use crate::session::SessionRegistry;
use crate::toolbox::Toolbox;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    pub session_id: SessionId,
    pub messages: Vec<HistoryEntry>,
    pub count: usize,
    pub usage: TokenUsage,
    /// Generation calls made for this session, classifier included.
    pub llm_calls: u64,
}

#[derive(Clone)]
pub struct ConciergeService {
    orchestrator: Arc<Orchestrator>,
    sessions: SessionRegistry,
}

impl ConciergeService {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            sessions: SessionRegistry::new(),
        }
    }

    /// Wire the OpenAI-compatible client, the keyword index and web search
    /// from configuration and the environment.
    pub fn from_config(config: &ConciergeConfig) -> Result<Self, ConciergeError> {
        let llm = &config.llm;
        let base = OpenAiConfig::from_env(
            llm.provider.api_key_env(),
            llm.resolved_base_url(),
            llm.resolved_model(),
        )
        .map_err(|e| match e {
            AiError::NotConfigured(msg) => ConciergeError::Config(ConfigError::MissingCredential(msg)),
            other => ConciergeError::Ai(other.to_string()),
        })?
        .with_max_tokens(llm.max_tokens)
        .with_timeout_secs(llm.timeout_secs);

        let handler_client: Arc<dyn AiClient> = Arc::new(
            OpenAiClient::new(base.clone().with_temperature(llm.temperature))
                .map_err(|e| ConciergeError::Ai(e.to_string()))?,
        );
        let classifier_client: Arc<dyn AiClient> = Arc::new(
            OpenAiClient::new(base.with_temperature(0.0)).map_err(|e| ConciergeError::Ai(e.to_string()))?,
        );

        let toolbox = Toolbox::new(
            load_retrieval(Path::new(&config.retrieval.docs_path))?,
            web_search_provider(config.web_search.enabled),
        )
        .with_default_k(config.retrieval.top_k as usize)
        .with_default_num_results(config.web_search.num_results as usize);

        let orchestrator = Orchestrator::new(
            Classifier::new(classifier_client),
            HandlerRegistry::new(handler_client, toolbox),
            llm.provider.as_str(),
        )
        .with_blocked_terms(config.guardrails.blocked_terms.clone());

        info!(
            provider = llm.provider.as_str(),
            model = llm.resolved_model(),
            "concierge service ready"
        );
        Ok(Self::new(orchestrator))
    }

    pub fn provider(&self) -> &str {
        self.orchestrator.provider()
    }

    pub fn model(&self) -> &str {
        self.orchestrator.model()
    }

    /// Process one message within `session_id`, creating the session on
    /// first use. Rejected input creates nothing.
    pub async fn send_message(&self, session_id: &SessionId, message: &str) -> ProcessResult {
        let sanitized = match self.orchestrator.screen(message) {
            Ok(text) => text,
            Err(rejection) => return rejection,
        };

        let conversation = self.sessions.get_or_create(session_id).await;
        let mut conversation = conversation.lock().await;
        self.orchestrator.process_screened(&mut conversation, &sanitized).await
    }

    /// `None` if the session was never created.
    pub async fn history(&self, session_id: &SessionId) -> Option<History> {
        let conversation = self.sessions.get(session_id).await?;
        let conversation = conversation.lock().await;
        let messages: Vec<HistoryEntry> = conversation
            .tagged_turns()
            .map(|(turn, category)| HistoryEntry {
                role: turn.role,
                content: turn.content.clone(),
                category,
            })
            .collect();
        Some(History {
            session_id: session_id.clone(),
            count: messages.len(),
            messages,
            usage: *conversation.tracker().total(),
            llm_calls: conversation.tracker().call_count(),
        })
    }

    /// Reset a session's turns, keeping the id. `false` if unknown.
    pub async fn clear(&self, session_id: &SessionId) -> bool {
        let Some(conversation) = self.sessions.get(session_id).await else {
            return false;
        };
        conversation.lock().await.clear();
        info!(session_id = %session_id, "conversation cleared");
        true
    }

    pub async fn sessions(&self) -> Vec<SessionId> {
        self.sessions.list().await
    }

    pub async fn explain(&self, query: &str) -> RoutingExplanation {
        self.orchestrator.classifier().explain(query).await
    }
}

fn load_retrieval(docs_path: &Path) -> Result<Arc<dyn RetrievalIndex>, ConciergeError> {
    match KeywordIndex::load_dir(docs_path) {
        Ok(index) => Ok(Arc::new(index)),
        Err(RetrievalError::NotFound(path)) => {
            warn!(path = %path.display(), "knowledge base directory not found, retrieval will return no passages");
            Ok(Arc::new(KeywordIndex::new()))
        }
        Err(e) => Err(ConciergeError::Tool(e.to_string())),
    }
}

fn web_search_provider(enabled: bool) -> Arc<dyn WebSearchProvider> {
    if !enabled {
        info!("web search disabled by configuration");
        return Arc::new(UnconfiguredSearch);
    }
    match SerpApiSearch::from_env() {
        Ok(search) => Arc::new(search),
        Err(e) => {
            warn!(error = %e, "web search unavailable");
            Arc::new(UnconfiguredSearch)
        }
    }
}

#[cfg(test)]
mod tests;
