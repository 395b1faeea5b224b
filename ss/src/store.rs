//! Core SessionStore implementation

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::DEFAULT_HISTORY_CAPACITY;

/// Unique identifier for a session
pub type SessionId = String;

/// One recorded user/agent exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Creation timestamp (unix ms)
    pub timestamp: i64,
    /// What the user said (may be empty for image-only requests)
    pub user_input: String,
    /// The agent's final message
    pub agent_response: String,
    /// Free-form annotations (e.g. the plan id that served this turn)
    pub metadata: Value,
}

/// Short-term memory for a single session
///
/// History is a bounded FIFO: appending beyond capacity evicts the oldest
/// turn. The context map is unbounded and only cleared explicitly.
#[derive(Debug, Clone)]
pub struct SessionMemory {
    session_id: SessionId,
    capacity: usize,
    history: VecDeque<ConversationTurn>,
    context: HashMap<String, Value>,
}

impl SessionMemory {
    /// Create an empty memory for the given session id
    pub fn new(session_id: impl Into<SessionId>, capacity: usize) -> Self {
        let session_id = session_id.into();
        debug!(%session_id, capacity, "SessionMemory::new: called");
        Self {
            session_id,
            capacity,
            history: VecDeque::with_capacity(capacity),
            context: HashMap::new(),
        }
    }

    /// Session id this memory belongs to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Maximum number of retained turns
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one conversation turn, evicting the oldest beyond capacity
    pub fn add_conversation(
        &mut self,
        user_input: impl Into<String>,
        agent_response: impl Into<String>,
        metadata: Value,
    ) {
        debug!(session_id = %self.session_id, len = self.history.len(), "SessionMemory::add_conversation: called");
        if self.capacity == 0 {
            return;
        }
        while self.history.len() >= self.capacity {
            let evicted = self.history.pop_front();
            debug!(
                session_id = %self.session_id,
                evicted_ts = evicted.map(|t| t.timestamp),
                "SessionMemory::add_conversation: evicted oldest turn"
            );
        }
        self.history.push_back(ConversationTurn {
            timestamp: chrono::Utc::now().timestamp_millis(),
            user_input: user_input.into(),
            agent_response: agent_response.into(),
            metadata,
        });
    }

    /// All retained turns, oldest first
    pub fn history(&self) -> &VecDeque<ConversationTurn> {
        &self.history
    }

    /// Store a scratch value under the given key
    pub fn update_context(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        debug!(session_id = %self.session_id, %key, "SessionMemory::update_context: called");
        self.context.insert(key, value);
    }

    /// Look up a single scratch value
    pub fn get_context(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// The whole scratch context map
    pub fn context(&self) -> &HashMap<String, Value> {
        &self.context
    }

    /// Drop all scratch context (history is unaffected)
    pub fn clear_context(&mut self) {
        debug!(session_id = %self.session_id, entries = self.context.len(), "SessionMemory::clear_context: called");
        self.context.clear();
    }
}

/// Session registry keyed by session id
///
/// Sessions are created lazily on first access and live until `remove` is
/// called. The map is behind an `RwLock` and each session behind its own
/// `Mutex`, so the store can be shared across concurrent requests; guards
/// must not be held across tool invocations.
pub struct SessionStore {
    capacity: usize,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionMemory>>>>,
}

impl SessionStore {
    /// Create a store with the default history capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a store whose sessions retain `capacity` turns each
    pub fn with_capacity(capacity: usize) -> Self {
        debug!(capacity, "SessionStore::with_capacity: called");
        Self {
            capacity,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the memory for a session, creating it on first access
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<SessionMemory>> {
        debug!(%session_id, "SessionStore::get_or_create: called");
        if let Some(existing) = self.sessions.read().await.get(session_id) {
            return Arc::clone(existing);
        }
        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock: another request may have created it
        // between our read and write acquisitions.
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(SessionMemory::new(session_id, self.capacity)))),
        )
    }

    /// Fetch an existing session without creating one
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<SessionMemory>>> {
        debug!(%session_id, "SessionStore::get: called");
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Drop a session entirely; returns true if it existed
    pub async fn remove(&self, session_id: &str) -> bool {
        debug!(%session_id, "SessionStore::remove: called");
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether any session exists
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_history_bounded_at_capacity() {
        let mut memory = SessionMemory::new("s1", 10);

        for i in 0..11 {
            memory.add_conversation(format!("question {}", i), format!("answer {}", i), json!({}));
        }

        assert_eq!(memory.history().len(), 10);
        // The 11th append evicted turn 0; the oldest retained is turn 1.
        assert_eq!(memory.history().front().unwrap().user_input, "question 1");
        assert_eq!(memory.history().back().unwrap().user_input, "question 10");
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let mut memory = SessionMemory::new("s1", 0);
        memory.add_conversation("hello", "hi", json!({}));
        assert!(memory.history().is_empty());
    }

    #[test]
    fn test_context_update_get_clear() {
        let mut memory = SessionMemory::new("s1", 10);

        memory.update_context("last_plan", json!("plan-1"));
        memory.update_context("last_plan", json!("plan-2"));
        assert_eq!(memory.get_context("last_plan"), Some(&json!("plan-2")));
        assert_eq!(memory.get_context("missing"), None);

        memory.clear_context();
        assert!(memory.context().is_empty());
    }

    #[test]
    fn test_turn_metadata_preserved() {
        let mut memory = SessionMemory::new("s1", 10);
        memory.add_conversation("q", "a", json!({"plan_id": "p-1"}));

        let turn = memory.history().front().unwrap();
        assert_eq!(turn.metadata["plan_id"], "p-1");
        assert!(turn.timestamp > 0);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let store = SessionStore::new();

        let first = store.get_or_create("user-1").await;
        first.lock().await.update_context("k", json!(1));

        let second = store.get_or_create("user-1").await;
        assert_eq!(second.lock().await.get_context("k"), Some(&json!(1)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_drops_session() {
        let store = SessionStore::new();
        store.get_or_create("user-1").await;

        assert!(store.remove("user-1").await);
        assert!(!store.remove("user-1").await);
        assert!(store.get("user-1").await.is_none());
        assert!(store.is_empty().await);
    }

    proptest! {
        #[test]
        fn prop_history_never_exceeds_capacity(capacity in 1usize..32, appends in 0usize..100) {
            let mut memory = SessionMemory::new("s1", capacity);
            for i in 0..appends {
                memory.add_conversation(format!("q{}", i), format!("a{}", i), json!({}));
            }
            prop_assert!(memory.history().len() <= capacity);
            prop_assert_eq!(memory.history().len(), appends.min(capacity));
        }
    }
}
