//! ExecutionContext - per-pass scratch state for tools

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::StepId;

/// Scratch state scoped to a single executor pass
///
/// The executor writes each successful step's raw result under
/// `step_{id}` and `step_{id}_result`; later steps' tools may read those
/// keys directly, bypassing the `_dependency_result` parameter. Both access
/// paths are supported on purpose - the direct keys are the legacy path.
///
/// A retry attempt gets a fresh context; nothing carries over between
/// passes. The session's context map rides along as a read-only snapshot,
/// separate from the per-pass entries.
#[derive(Debug, Default, Clone)]
pub struct ExecutionContext {
    /// Read-only snapshot of the session context at pass start
    shared: Map<String, Value>,

    /// Per-pass entries (`step_{id}` keys plus tool scratch)
    entries: Map<String, Value>,
}

impl ExecutionContext {
    /// Fresh, empty context with no session snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh context carrying a session-context snapshot
    pub fn with_shared(shared: Map<String, Value>) -> Self {
        debug!(shared_keys = shared.len(), "ExecutionContext::with_shared: called");
        Self {
            shared,
            entries: Map::new(),
        }
    }

    /// Record a step's raw result under both legacy keys
    pub fn record_step(&mut self, step_id: StepId, result: &Value) {
        debug!(step_id, "ExecutionContext::record_step: called");
        self.entries.insert(format!("step_{}", step_id), result.clone());
        self.entries.insert(format!("step_{}_result", step_id), result.clone());
    }

    /// Read the raw result a prior step stored this pass
    pub fn step_result(&self, step_id: StepId) -> Option<&Value> {
        self.entries.get(&format!("step_{}", step_id))
    }

    /// Read any per-pass entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Store a per-pass entry (tools may stash their own scratch)
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Read a value from the session-context snapshot
    pub fn shared(&self, key: &str) -> Option<&Value> {
        self.shared.get(key)
    }
}
