//! Self-correction - evaluate a pass, retry the whole plan on failure
//!
//! The retry policy is deliberately blunt: a failed pass re-runs the entire
//! plan from step 1 immediately, with no backoff and no partial re-run of
//! only the failed steps. Previously successful steps run again. The policy
//! is easy to audit and the tests depend on exactly this shape; do not
//! quietly upgrade it to selective re-execution.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::{
    Evaluation, ExecutionPlan, ExecutionResult, ExecutionStatus, FinalResult, FinalStatus, StepId,
};
use crate::executor::PlanExecutor;

/// Fixed user-facing message for a successful request
pub const SUCCESS_MESSAGE: &str = "작업이 성공적으로 완료되었습니다.";

/// Fixed user-facing message when retries are exhausted
pub const FAILURE_MESSAGE: &str = "최대 재시도 횟수에 도달했습니다.";

/// Default retry bound: one retry beyond the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Judge one executor pass.
///
/// A missing or non-success final outcome fails the evaluation outright,
/// regardless of the other steps. Otherwise success requires every step to
/// have succeeded and the pass to have completed. (Earlier revisions had
/// two subtly different branches here; this is the unified rule.)
pub fn evaluate(execution_result: &ExecutionResult) -> Evaluation {
    debug!(plan_id = %execution_result.plan_id, "evaluate: called");
    let mut failed_steps: Vec<StepId> = execution_result
        .all_results
        .iter()
        .filter(|(_, outcome)| !outcome.is_success())
        .map(|(id, _)| *id)
        .collect();
    failed_steps.sort_unstable();

    let total_steps = execution_result.all_results.len();
    let successful_steps = total_steps - failed_steps.len();

    let success = match &execution_result.final_result {
        Some(final_outcome) if final_outcome.is_success() => {
            failed_steps.is_empty() && execution_result.status == ExecutionStatus::Completed
        }
        _ => false,
    };

    debug!(success, failed = failed_steps.len(), total_steps, "evaluate: judged");
    Evaluation {
        success,
        failed_steps,
        total_steps,
        successful_steps,
        execution_status: execution_result.status.to_string(),
    }
}

/// Bounded whole-plan retry controller
pub struct SelfCorrection {
    max_retries: u32,
}

impl SelfCorrection {
    /// Controller allowing `max_retries` re-runs beyond the first attempt
    pub fn new(max_retries: u32) -> Self {
        debug!(max_retries, "SelfCorrection::new: called");
        Self { max_retries }
    }

    /// Configured retry bound
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Drive a first pass result to a final verdict.
    ///
    /// Implemented as an explicit loop rather than recursion - no state
    /// accumulates across attempts beyond the counter, and the stack stays
    /// flat for large retry bounds.
    pub async fn run(
        &self,
        executor: &PlanExecutor,
        plan: &ExecutionPlan,
        shared: &Map<String, Value>,
        first_pass: ExecutionResult,
    ) -> FinalResult {
        debug!(plan_id = %plan.plan_id, max_retries = self.max_retries, "SelfCorrection::run: called");
        let mut current = first_pass;
        let mut retry_count = 0u32;

        loop {
            let evaluation = evaluate(&current);

            if evaluation.success {
                info!("Plan {} succeeded after {} retries", plan.plan_id, retry_count);
                return FinalResult {
                    status: FinalStatus::Success,
                    message: SUCCESS_MESSAGE.to_string(),
                    data: current,
                    evaluation,
                };
            }

            if retry_count < self.max_retries {
                retry_count += 1;
                warn!(
                    plan_id = %plan.plan_id,
                    retry_count,
                    failed_steps = evaluation.failed_steps.len(),
                    "SelfCorrection::run: pass failed, re-running plan"
                );
                // Same plan object, fresh pass, no delay.
                current = executor.execute(plan, shared).await;
            } else {
                warn!(plan_id = %plan.plan_id, retry_count, "SelfCorrection::run: retries exhausted");
                return FinalResult {
                    status: FinalStatus::Failed,
                    message: FAILURE_MESSAGE.to_string(),
                    data: current,
                    evaluation,
                };
            }
        }
    }
}

impl Default for SelfCorrection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExecutionStep, StepOutcome};
    use crate::tools::{ExecutionContext, Tool, ToolError, ToolRegistry};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn result_with(outcomes: Vec<StepOutcome>, final_id: Option<StepId>) -> ExecutionResult {
        let map: HashMap<StepId, StepOutcome> = outcomes.into_iter().map(|o| (o.step_id, o)).collect();
        let final_result = final_id.and_then(|id| map.get(&id).cloned());
        ExecutionResult {
            status: ExecutionStatus::Completed,
            plan_id: "plan-test".to_string(),
            steps: map.clone(),
            final_result,
            all_results: map,
        }
    }

    #[test]
    fn test_evaluate_all_success() {
        let result = result_with(
            vec![StepOutcome::success(1, json!({})), StepOutcome::success(2, json!({}))],
            Some(2),
        );
        let evaluation = evaluate(&result);

        assert!(evaluation.success);
        assert!(evaluation.failed_steps.is_empty());
        assert_eq!(evaluation.total_steps, 2);
        assert_eq!(evaluation.successful_steps, 2);
        assert_eq!(evaluation.execution_status, "completed");
    }

    #[test]
    fn test_evaluate_failed_final_step_fails_even_if_others_passed() {
        let result = result_with(
            vec![
                StepOutcome::success(1, json!({})),
                StepOutcome::success(2, json!({})),
                StepOutcome::success(3, json!({})),
                StepOutcome::error(4, "boom"),
            ],
            Some(4),
        );
        let evaluation = evaluate(&result);

        assert!(!evaluation.success);
        assert_eq!(evaluation.failed_steps, vec![4]);
        assert_eq!(evaluation.successful_steps, 3);
    }

    #[test]
    fn test_evaluate_mid_step_failure_fails_despite_final_success() {
        let result = result_with(
            vec![StepOutcome::error(1, "boom"), StepOutcome::success(2, json!({}))],
            Some(2),
        );
        let evaluation = evaluate(&result);

        assert!(!evaluation.success);
        assert_eq!(evaluation.failed_steps, vec![1]);
    }

    #[test]
    fn test_evaluate_missing_final_result_fails() {
        let result = result_with(vec![], None);
        let evaluation = evaluate(&result);

        assert!(!evaluation.success);
        assert_eq!(evaluation.total_steps, 0);
    }

    /// Counts invocations and fails until the configured attempt number.
    struct FlakyTool {
        calls: Arc<AtomicUsize>,
        succeed_from_call: usize,
    }

    #[async_trait]
    impl Tool for FlakyTool {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn invoke(
            &self,
            _action: &str,
            _parameters: &Map<String, Value>,
            _context: &mut ExecutionContext,
        ) -> Result<Value, ToolError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.succeed_from_call {
                Ok(json!({"call": call}))
            } else {
                Err(ToolError::Failed(format!("failure on call {}", call)))
            }
        }
    }

    fn single_step_plan() -> ExecutionPlan {
        ExecutionPlan {
            plan_id: "plan-test".to_string(),
            steps: vec![ExecutionStep {
                step_id: 1,
                tool: "flaky".to_string(),
                action: "run".to_string(),
                parameters: Map::new(),
                dependencies: vec![],
            }],
        }
    }

    fn flaky_executor(succeed_from_call: usize) -> (PlanExecutor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(FlakyTool {
            calls: Arc::clone(&calls),
            succeed_from_call,
        });
        (PlanExecutor::new(Arc::new(registry)), calls)
    }

    #[tokio::test]
    async fn test_perpetual_failure_executes_at_most_twice() {
        let (executor, calls) = flaky_executor(usize::MAX);
        let plan = single_step_plan();
        let shared = Map::new();

        let first = executor.execute(&plan, &shared).await;
        let verdict = SelfCorrection::new(1).run(&executor, &plan, &shared, first).await;

        assert_eq!(verdict.status, FinalStatus::Failed);
        assert_eq!(verdict.message, FAILURE_MESSAGE);
        // Initial attempt + exactly one retry.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_immediate_success_executes_once() {
        let (executor, calls) = flaky_executor(1);
        let plan = single_step_plan();
        let shared = Map::new();

        let first = executor.execute(&plan, &shared).await;
        let verdict = SelfCorrection::new(1).run(&executor, &plan, &shared, first).await;

        assert_eq!(verdict.status, FinalStatus::Success);
        assert_eq!(verdict.message, SUCCESS_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_flaky_plan() {
        // Fails on the first call, succeeds on the second: the single
        // allowed retry turns the verdict around.
        let (executor, calls) = flaky_executor(2);
        let plan = single_step_plan();
        let shared = Map::new();

        let first = executor.execute(&plan, &shared).await;
        let verdict = SelfCorrection::new(1).run(&executor, &plan, &shared, first).await;

        assert_eq!(verdict.status, FinalStatus::Success);
        assert!(verdict.evaluation.success);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_failure() {
        let (executor, calls) = flaky_executor(2);
        let plan = single_step_plan();
        let shared = Map::new();

        let first = executor.execute(&plan, &shared).await;
        let verdict = SelfCorrection::new(0).run(&executor, &plan, &shared, first).await;

        assert_eq!(verdict.status, FinalStatus::Failed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
