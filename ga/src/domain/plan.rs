//! Abstract and concrete plan types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Plan-scoped step identifier
///
/// Assigned by the planner in execution order, starting at 1.
pub type StepId = u32;

/// High-level plan family, one per intent kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    /// 2D image to 3D try-on pipeline
    #[serde(rename = "3d_generation")]
    ThreeDGeneration,
    /// Catalog search and recommendation
    #[serde(rename = "garment_recommendation")]
    GarmentRecommendation,
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreeDGeneration => write!(f, "3d_generation"),
            Self::GarmentRecommendation => write!(f, "garment_recommendation"),
        }
    }
}

/// Tool-agnostic description of the goal and its phases
///
/// Built by the orchestrator from the classified intent, consumed by the
/// planner. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbstractPlan {
    /// Plan family
    pub plan_type: PlanType,

    /// Human-readable goal
    pub goal: String,

    /// Ordered phase names (human-readable, not tool-bound)
    pub steps: Vec<String>,

    /// Inputs the phases will need (image path, query text, filters)
    pub parameters: Map<String, Value>,

    /// Creation timestamp (unix ms)
    pub created_at: i64,
}

impl AbstractPlan {
    /// Build a plan stamped with the current time
    pub fn new(plan_type: PlanType, goal: impl Into<String>, steps: Vec<String>, parameters: Map<String, Value>) -> Self {
        debug!(%plan_type, step_count = steps.len(), "AbstractPlan::new: called");
        Self {
            plan_type,
            goal: goal.into(),
            steps,
            parameters,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// One concrete, tool-bound step of an execution plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionStep {
    /// Plan-scoped id, also the dependency reference key
    pub step_id: StepId,

    /// Registry key of the tool that runs this step
    pub tool: String,

    /// Sub-operation the tool must support
    pub action: String,

    /// Tool parameters (opaque at this layer)
    #[serde(default)]
    pub parameters: Map<String, Value>,

    /// Step ids this step consumes results from; must all be declared earlier
    #[serde(default)]
    pub dependencies: Vec<StepId>,
}

/// A malformed execution plan, rejected before execution
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Step ids must start at 1, found {0}")]
    FirstStepId(StepId),

    #[error("Step id {step_id} does not increase over previous id {previous}")]
    NonMonotonicId { step_id: StepId, previous: StepId },

    #[error("Step {step_id} depends on {dependency}, which is not declared earlier")]
    ForwardDependency { step_id: StepId, dependency: StepId },
}

/// Concrete, dependency-annotated step sequence for one request
///
/// Owned by the planner; executed by reference, never mutated. Retries
/// re-run the same plan object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Unique plan id (one per planner call)
    pub plan_id: String,

    /// Steps in declared execution order
    pub steps: Vec<ExecutionStep>,
}

impl ExecutionPlan {
    /// Check the planner contract: ids start at 1 and strictly increase in
    /// declared order, and every dependency references an earlier step.
    ///
    /// The graph is acyclic by construction when this passes; the executor
    /// relies on these invariants instead of re-checking them.
    pub fn validate(&self) -> Result<(), PlanError> {
        debug!(plan_id = %self.plan_id, step_count = self.steps.len(), "ExecutionPlan::validate: called");
        let mut previous: Option<StepId> = None;

        for step in &self.steps {
            match previous {
                None if step.step_id != 1 => return Err(PlanError::FirstStepId(step.step_id)),
                Some(prev) if step.step_id <= prev => {
                    return Err(PlanError::NonMonotonicId {
                        step_id: step.step_id,
                        previous: prev,
                    });
                }
                _ => {}
            }

            for &dependency in &step.dependencies {
                if dependency >= step.step_id {
                    return Err(PlanError::ForwardDependency {
                        step_id: step.step_id,
                        dependency,
                    });
                }
            }

            previous = Some(step.step_id);
        }

        debug!(plan_id = %self.plan_id, "ExecutionPlan::validate: ok");
        Ok(())
    }

    /// Highest declared step id, if any step exists
    pub fn max_step_id(&self) -> Option<StepId> {
        self.steps.iter().map(|s| s.step_id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(step_id: StepId, dependencies: Vec<StepId>) -> ExecutionStep {
        ExecutionStep {
            step_id,
            tool: "extensions_2d_to_3d".to_string(),
            action: "analyze_image".to_string(),
            parameters: Map::new(),
            dependencies,
        }
    }

    #[test]
    fn test_validate_accepts_chained_plan() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(1, vec![]), step(2, vec![1]), step(3, vec![2])],
        };
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_gaps_in_ids() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(1, vec![]), step(4, vec![1])],
        };
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_first_id_not_one() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(2, vec![])],
        };
        assert!(matches!(plan.validate(), Err(PlanError::FirstStepId(2))));
    }

    #[test]
    fn test_validate_rejects_non_monotonic_ids() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(1, vec![]), step(3, vec![]), step(2, vec![])],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::NonMonotonicId { step_id: 2, previous: 3 })
        ));
    }

    #[test]
    fn test_validate_rejects_forward_dependency() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(1, vec![]), step(2, vec![3])],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::ForwardDependency { step_id: 2, dependency: 3 })
        ));
    }

    #[test]
    fn test_validate_rejects_self_dependency() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(1, vec![1])],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::ForwardDependency { step_id: 1, dependency: 1 })
        ));
    }

    #[test]
    fn test_max_step_id() {
        let plan = ExecutionPlan {
            plan_id: "p-1".to_string(),
            steps: vec![step(1, vec![]), step(5, vec![]), step(3, vec![])],
        };
        assert_eq!(plan.max_step_id(), Some(5));

        let empty = ExecutionPlan {
            plan_id: "p-2".to_string(),
            steps: vec![],
        };
        assert_eq!(empty.max_step_id(), None);
    }
}
