//! Per-session conversation state and the registry that owns it.

use std::collections::HashMap;
use std::sync::Arc;

use concierge_ai::{Message, TokenTracker};
use concierge_common::SessionId;
use tokio::sync::{Mutex, RwLock};

use crate::category::Category;

/// Append-only turn history for one session.
///
/// Each turn is tagged with the category of the user turn it belongs to.
/// The tag is for analytics only.
#[derive(Debug, Clone)]
pub struct Conversation {
    session_id: SessionId,
    turns: Vec<Message>,
    categories: Vec<Category>,
    tracker: TokenTracker,
}

impl Conversation {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            turns: Vec::new(),
            categories: Vec::new(),
            tracker: TokenTracker::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    /// Turns paired with their category tags.
    pub fn tagged_turns(&self) -> impl Iterator<Item = (&Message, Category)> {
        self.turns.iter().zip(self.categories.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn extend(&mut self, category: Category, turns: impl IntoIterator<Item = Message>) {
        for turn in turns {
            self.turns.push(turn);
            self.categories.push(category);
        }
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut TokenTracker {
        &mut self.tracker
    }

    /// Drop every turn, keeping the session id.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.categories.clear();
        self.tracker.reset();
    }
}

pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Concurrent map from session id to conversation.
///
/// Conversations are created lazily, at most once per id, and never evicted.
/// Each one sits behind its own mutex, so calls for one session run one at a
/// time while different sessions proceed independently.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SharedConversation>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing conversation for `id`, or a new empty one.
    pub async fn get_or_create(&self, id: &SessionId) -> SharedConversation {
        if let Some(existing) = self.sessions.read().await.get(id) {
            return existing.clone();
        }
        let mut map = self.sessions.write().await;
        map.entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "session created");
                Arc::new(Mutex::new(Conversation::new(id.clone())))
            })
            .clone()
    }

    pub async fn get(&self, id: &SessionId) -> Option<SharedConversation> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Sorted ids of every known session.
    pub async fn list(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.read().await.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
