//! Builtin tools for the garment agent
//!
//! Both tool families are deterministic mock backends: the real
//! ChatGarment pipeline (VLM inference, pattern generation, cloth
//! simulation) and the product catalog service live outside this crate.
//! The mocks reproduce the shapes and failure modes the orchestration core
//! is written against.

mod garment_pipeline;
mod product_search;

pub use garment_pipeline::{GARMENT_PIPELINE_TOOL, GarmentPipelineTool};
pub use product_search::{PRODUCT_SEARCH_TOOL, ProductSearchTool};

use serde_json::{Map, Value};

use super::ExecutionContext;
use crate::domain::StepId;

/// Fetch the upstream result a chained action consumes.
///
/// Preferred path is the `_dependency_result` parameter injected by the
/// executor; the fallback reads the legacy `step_{id}` context key directly.
pub(crate) fn upstream_result(
    parameters: &Map<String, Value>,
    context: &ExecutionContext,
    step_id: StepId,
) -> Option<Value> {
    parameters
        .get("_dependency_result")
        .cloned()
        .or_else(|| context.step_result(step_id).cloned())
}
