//! SessionStore - per-session conversation memory
//!
//! Keeps short-term state for each chat session: a bounded FIFO of
//! conversation turns plus a free-form key/value context blob. Sessions are
//! created lazily on first access and live until explicitly removed.
//!
//! # Architecture
//!
//! ```text
//! SessionStore
//! └── {session_id}          (Arc<Mutex<SessionMemory>>)
//!     ├── history           bounded VecDeque<ConversationTurn>, oldest evicted
//!     └── context           unbounded HashMap<String, Value>, explicit clear
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sessionstore::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.get_or_create("user-42").await;
//! let mut memory = session.lock().await;
//! memory.add_conversation("hello", "hi there", serde_json::json!({}));
//! ```
//!
//! The store itself is safe to share across in-flight requests; each session
//! sits behind its own mutex. Callers that funnel one session through
//! concurrent requests still get last-writer-wins ordering, nothing stronger.

mod store;

pub use store::{ConversationTurn, SessionId, SessionMemory, SessionStore};

/// Default number of conversation turns retained per session
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
