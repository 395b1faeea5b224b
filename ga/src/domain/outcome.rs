//! Execution outcomes and evaluation types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::plan::StepId;

/// Outcome status of a single step attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Error,
}

/// The recorded result of running one step once
///
/// One instance per step per attempt; the outcome map is rebuilt from
/// scratch on every retry, never merged across attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Success or error
    pub status: StepStatus,

    /// Raw tool output (opaque), present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Stringified failure, present on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Id of the step this outcome belongs to
    pub step_id: StepId,
}

impl StepOutcome {
    /// Successful outcome carrying the tool's return value
    pub fn success(step_id: StepId, result: Value) -> Self {
        Self {
            status: StepStatus::Success,
            result: Some(result),
            error: None,
            step_id,
        }
    }

    /// Failed outcome carrying the stringified error
    pub fn error(step_id: StepId, error: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Error,
            result: None,
            error: Some(error.into()),
            step_id,
        }
    }

    /// Whether this outcome is a success
    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Status of one executor pass
///
/// Always `Completed`: it means "the step loop ran to the end", not "the
/// plan succeeded". Success judgment belongs to [`Evaluation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Completed,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Everything one executor pass produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Pass status (see [`ExecutionStatus`])
    pub status: ExecutionStatus,

    /// Id of the executed plan
    pub plan_id: String,

    /// Outcome per step id
    pub steps: HashMap<StepId, StepOutcome>,

    /// Outcome of the numerically highest step id; `None` for an empty plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_result: Option<StepOutcome>,

    /// Same mapping as `steps`, kept for the original wire shape
    pub all_results: HashMap<StepId, StepOutcome>,
}

/// Derived success/failure judgment over one ExecutionResult
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Overall verdict
    pub success: bool,

    /// Ids whose outcome was not a success
    pub failed_steps: Vec<StepId>,

    /// Total steps that ran
    pub total_steps: usize,

    /// Steps that succeeded
    pub successful_steps: usize,

    /// The pass status, stringified
    pub execution_status: String,
}

/// Terminal request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Success,
    Failed,
}

impl std::fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What the caller receives for every business-logic path
///
/// Plan failure is data, not an error: retries exhausted surfaces here as
/// `status: failed`, never as an exception crossing `process_request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResult {
    /// `success` or `failed`
    pub status: FinalStatus,

    /// Fixed user-facing message for the status
    pub message: String,

    /// The last executor pass
    pub data: ExecutionResult,

    /// Judgment that produced `status`
    pub evaluation: Evaluation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_constructors() {
        let ok = StepOutcome::success(3, json!({"mesh": "m.obj"}));
        assert!(ok.is_success());
        assert_eq!(ok.step_id, 3);
        assert!(ok.error.is_none());

        let err = StepOutcome::error(4, "Tool 'x' not found");
        assert!(!err.is_success());
        assert_eq!(err.error.as_deref(), Some("Tool 'x' not found"));
        assert!(err.result.is_none());
    }

    #[test]
    fn test_final_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(FinalStatus::Success).unwrap(), json!("success"));
        assert_eq!(serde_json::to_value(FinalStatus::Failed).unwrap(), json!("failed"));
        assert_eq!(FinalStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_step_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(StepStatus::Success).unwrap(), json!("success"));
        assert_eq!(serde_json::to_value(StepStatus::Error).unwrap(), json!("error"));
    }
}
