//! Domain types for the garment agent
//!
//! Core request/plan/outcome types: Intent, AbstractPlan, ExecutionPlan,
//! StepOutcome, ExecutionResult, Evaluation, FinalResult.
//!
//! Statuses and step ids are strongly typed; only tool parameters and tool
//! results stay `serde_json::Value`, and that opacity is confined to the
//! tool boundary.

mod intent;
mod outcome;
mod plan;

pub use intent::{Intent, IntentKind};
pub use outcome::{
    Evaluation, ExecutionResult, ExecutionStatus, FinalResult, FinalStatus, StepOutcome, StepStatus,
};
pub use plan::{AbstractPlan, ExecutionPlan, ExecutionStep, PlanError, PlanType, StepId};
