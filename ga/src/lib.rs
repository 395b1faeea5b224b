//! GarmentAgent - agentic orchestrator for garment try-on and recommendation
//!
//! A user request (text and/or garment image) is classified into an intent,
//! expanded into an abstract plan, turned into a concrete dependency-aware
//! step sequence by a planner, and executed against a registry of pluggable
//! tools, with a bounded whole-plan retry on failure.
//!
//! # Core Concepts
//!
//! - **Plans are immutable**: a retry re-runs the same plan object from
//!   step 1; per-pass state never survives an attempt
//! - **Failures are data**: tool errors become step outcomes, plan failure
//!   becomes a `failed` FinalResult - only planner failure is an error
//! - **Explicit wiring**: tools, planner, and retriever are injected at
//!   startup; there is no ambient global registry
//!
//! # Modules
//!
//! - [`intent`] - keyword-rule intent classification
//! - [`planner`] - plan generation boundary and the template expansion
//! - [`executor`] - step-by-step plan execution
//! - [`correction`] - evaluation and the bounded retry loop
//! - [`tools`] - tool trait, registry, and builtin mock tools
//! - [`retrieval`] - garment knowledge-base boundary
//! - [`orchestrator`] - top-level request processing
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod correction;
pub mod domain;
pub mod executor;
pub mod intent;
pub mod orchestrator;
pub mod planner;
pub mod retrieval;
pub mod tools;

// Re-export commonly used types
pub use config::Config;
pub use correction::{DEFAULT_MAX_RETRIES, FAILURE_MESSAGE, SUCCESS_MESSAGE, SelfCorrection, evaluate};
pub use domain::{
    AbstractPlan, Evaluation, ExecutionPlan, ExecutionResult, ExecutionStatus, ExecutionStep, FinalResult,
    FinalStatus, Intent, IntentKind, PlanError, PlanType, StepId, StepOutcome, StepStatus,
};
pub use executor::PlanExecutor;
pub use intent::classify_intent;
pub use orchestrator::{AgentError, DEFAULT_SESSION_ID, InputData, Orchestrator, RequestPayload, build_abstract_plan};
pub use planner::{Planner, PlannerError, TemplatePlanner};
pub use retrieval::{KnowledgeRetriever, RetrievalContext, StaticKnowledgeBase, Suggestion};
pub use tools::{ExecutionContext, Tool, ToolError, ToolRegistry};
