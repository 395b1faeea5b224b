//! PlanExecutor - runs execution plans step by step
//!
//! Steps run strictly in declared order, one at a time; the declared order
//! IS the execution order. This is a deliberate simplification - there is
//! no topological scheduler and no parallelism across steps, so there is
//! also nothing to synchronize. One step's failure never aborts the pass:
//! every failure becomes a recorded outcome and the loop keeps walking.
//!
//! The executor applies no timeout of its own around tool calls. A tool
//! that never returns hangs the whole pass (and the retry loop above it);
//! deadlines belong to the tool's own backend.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::{ExecutionPlan, ExecutionResult, ExecutionStatus, StepId, StepOutcome};
use crate::tools::{ExecutionContext, ToolRegistry};

/// Thread one upstream result into a step's parameters.
///
/// A single `_dependency_result` slot is shared by all dependencies: each
/// recorded dependency overwrites the slot in declaration order, so the
/// last one wins. Steps with several dependencies cannot see more than one
/// upstream result through this path - a known expressiveness limit, kept
/// for compatibility with the existing tools and isolated here so a
/// multi-dependency scheme only has to replace this function. When the
/// dependency's outcome carries a result payload that payload is threaded;
/// otherwise the whole outcome record is.
fn inject_dependency_result(
    parameters: &mut Map<String, Value>,
    dependencies: &[StepId],
    results: &HashMap<StepId, StepOutcome>,
) {
    for dependency in dependencies {
        if let Some(outcome) = results.get(dependency) {
            debug!(dependency, "inject_dependency_result: threading result");
            let value = outcome
                .result
                .clone()
                .unwrap_or_else(|| serde_json::to_value(outcome).unwrap_or(Value::Null));
            parameters.insert("_dependency_result".to_string(), value);
        }
    }
}

/// Step-by-step plan execution engine
pub struct PlanExecutor {
    registry: Arc<ToolRegistry>,
}

impl PlanExecutor {
    /// Create an executor over the given tool registry
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        debug!("PlanExecutor::new: called");
        Self { registry }
    }

    /// Run one full pass over the plan
    ///
    /// `shared` is a snapshot of the session context, exposed read-only to
    /// tools; the per-pass [`ExecutionContext`] starts empty on every call,
    /// so replaying the same plan is a clean re-run. The returned status is
    /// always `Completed` - it means the loop reached the end, not that the
    /// plan succeeded. Judgment is the evaluator's job.
    pub async fn execute(&self, plan: &ExecutionPlan, shared: &Map<String, Value>) -> ExecutionResult {
        debug!(plan_id = %plan.plan_id, step_count = plan.steps.len(), "PlanExecutor::execute: called");
        info!("Executing plan {} ({} steps)", plan.plan_id, plan.steps.len());

        let mut results: HashMap<StepId, StepOutcome> = HashMap::new();
        let mut context = ExecutionContext::with_shared(shared.clone());

        for step in &plan.steps {
            debug!(
                step_id = step.step_id,
                tool = %step.tool,
                action = %step.action,
                "PlanExecutor::execute: step start"
            );

            // The plan is never mutated - dependency threading happens on a
            // per-attempt copy of the parameters.
            let mut parameters = step.parameters.clone();
            if !step.dependencies.is_empty() {
                inject_dependency_result(&mut parameters, &step.dependencies, &results);
            }

            let Some(tool) = self.registry.get(&step.tool) else {
                warn!(step_id = step.step_id, tool = %step.tool, "PlanExecutor::execute: tool not registered");
                results.insert(
                    step.step_id,
                    StepOutcome::error(step.step_id, format!("Tool '{}' not found", step.tool)),
                );
                continue;
            };

            match tool.invoke(&step.action, &parameters, &mut context).await {
                Ok(result) => {
                    debug!(step_id = step.step_id, "PlanExecutor::execute: step succeeded");
                    context.record_step(step.step_id, &result);
                    results.insert(step.step_id, StepOutcome::success(step.step_id, result));
                }
                Err(e) => {
                    warn!(step_id = step.step_id, error = %e, "PlanExecutor::execute: step failed");
                    results.insert(step.step_id, StepOutcome::error(step.step_id, e.to_string()));
                }
            }
        }

        // The final result is the outcome of the numerically highest step
        // id, not the last declared step - ids and declaration order can
        // disagree.
        let final_result = plan.max_step_id().and_then(|id| results.get(&id).cloned());

        debug!(plan_id = %plan.plan_id, recorded = results.len(), "PlanExecutor::execute: pass complete");
        ExecutionResult {
            status: ExecutionStatus::Completed,
            plan_id: plan.plan_id.clone(),
            steps: results.clone(),
            final_result,
            all_results: results,
        }
    }
}
