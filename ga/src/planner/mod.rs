//! Plan generation boundary
//!
//! The planner turns an abstract plan plus ambient context into a concrete,
//! tool-bound [`ExecutionPlan`]. Production deployments delegate this to a
//! fine-tuned VLM agent; [`TemplatePlanner`] is the deterministic expansion
//! its fallback produces, and any other implementation (LLM-backed or
//! otherwise) plugs in behind the same trait.
//!
//! Contract for every implementation: step ids start at 1 and increase
//! monotonically in declared order, dependencies only reference earlier
//! steps, and the plan id is unique per call.

mod template;

pub use template::TemplatePlanner;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{AbstractPlan, ExecutionPlan, PlanError};

/// Errors from plan generation
///
/// These are infrastructure failures: they propagate out of
/// `process_request` instead of becoming a failed FinalResult.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The generated plan violates the step-id/dependency contract
    #[error("Planner produced a malformed plan: {0}")]
    Malformed(#[from] PlanError),

    /// The planning backend could not be reached or answered garbage
    #[error("Planner unavailable: {0}")]
    Unavailable(String),
}

/// Plan generation capability
#[async_trait]
pub trait Planner: Send + Sync {
    /// Expand an abstract plan into executable steps
    ///
    /// `context` is the raw request input map; `retrieval` is the shaped
    /// knowledge-base context when a retriever is configured.
    async fn generate(
        &self,
        abstract_plan: &AbstractPlan,
        context: &Map<String, Value>,
        retrieval: Option<&Value>,
        user_text: Option<&str>,
        image_path: Option<&str>,
    ) -> Result<ExecutionPlan, PlannerError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Scripted planner for unit tests
    pub struct MockPlanner {
        plans: Mutex<Vec<Result<ExecutionPlan, String>>>,
        call_count: AtomicUsize,
    }

    impl MockPlanner {
        pub fn new(plans: Vec<Result<ExecutionPlan, String>>) -> Self {
            debug!(plan_count = plans.len(), "MockPlanner::new: called");
            Self {
                plans: Mutex::new(plans),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Planner for MockPlanner {
        async fn generate(
            &self,
            _abstract_plan: &AbstractPlan,
            _context: &Map<String, Value>,
            _retrieval: Option<&Value>,
            _user_text: Option<&str>,
            _image_path: Option<&str>,
        ) -> Result<ExecutionPlan, PlannerError> {
            debug!("MockPlanner::generate: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let mut plans = self.plans.lock().expect("mock planner lock");
            if plans.is_empty() {
                return Err(PlannerError::Unavailable("No more mock plans".to_string()));
            }
            plans.remove(0).map_err(PlannerError::Unavailable)
        }
    }
}
