//! TemplatePlanner - deterministic plan expansion

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{AbstractPlan, ExecutionPlan, ExecutionStep, PlanType};
use crate::tools::builtin::{GARMENT_PIPELINE_TOOL, PRODUCT_SEARCH_TOOL};

use super::{Planner, PlannerError};

/// Deterministic planner expanding each plan family into its fixed step
/// template
///
/// Generation becomes the four chained pipeline actions; recommendation
/// becomes search followed by matching. The expansion is validated against
/// the planner contract before it is returned, so a template bug fails
/// fast here rather than somewhere inside the executor.
pub struct TemplatePlanner;

impl TemplatePlanner {
    pub fn new() -> Self {
        Self
    }

    fn generation_steps(
        &self,
        abstract_plan: &AbstractPlan,
        user_text: Option<&str>,
        image_path: Option<&str>,
    ) -> Vec<ExecutionStep> {
        let image_path = image_path
            .map(Value::from)
            .or_else(|| abstract_plan.parameters.get("image_path").cloned())
            .unwrap_or(Value::Null);
        let text = user_text
            .map(Value::from)
            .or_else(|| abstract_plan.parameters.get("text").cloned())
            .unwrap_or(Value::Null);

        let mut analyze_params = Map::new();
        analyze_params.insert("image_path".to_string(), image_path);
        analyze_params.insert("text_description".to_string(), text);

        vec![
            ExecutionStep {
                step_id: 1,
                tool: GARMENT_PIPELINE_TOOL.to_string(),
                action: "analyze_image".to_string(),
                parameters: analyze_params,
                dependencies: vec![],
            },
            ExecutionStep {
                step_id: 2,
                tool: GARMENT_PIPELINE_TOOL.to_string(),
                action: "generate_pattern".to_string(),
                parameters: Map::new(),
                dependencies: vec![1],
            },
            ExecutionStep {
                step_id: 3,
                tool: GARMENT_PIPELINE_TOOL.to_string(),
                action: "convert_to_3d".to_string(),
                parameters: Map::new(),
                dependencies: vec![2],
            },
            ExecutionStep {
                step_id: 4,
                tool: GARMENT_PIPELINE_TOOL.to_string(),
                action: "render_result".to_string(),
                parameters: Map::new(),
                dependencies: vec![3],
            },
        ]
    }

    fn recommendation_steps(
        &self,
        abstract_plan: &AbstractPlan,
        retrieval: Option<&Value>,
        user_text: Option<&str>,
    ) -> Vec<ExecutionStep> {
        let query = user_text
            .map(Value::from)
            .or_else(|| abstract_plan.parameters.get("query").cloned())
            .unwrap_or(Value::Null);
        let filters = abstract_plan
            .parameters
            .get("filters")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let mut search_params = Map::new();
        search_params.insert("query".to_string(), query);
        search_params.insert("filters".to_string(), filters);
        if let Some(retrieval) = retrieval {
            // Surfaced to the search tool as a hint; the mock backend
            // ignores it, a ranking backend would not.
            search_params.insert("retrieval_context".to_string(), retrieval.clone());
        }

        vec![
            ExecutionStep {
                step_id: 1,
                tool: PRODUCT_SEARCH_TOOL.to_string(),
                action: "search_products".to_string(),
                parameters: search_params,
                dependencies: vec![],
            },
            ExecutionStep {
                step_id: 2,
                tool: PRODUCT_SEARCH_TOOL.to_string(),
                action: "match_recommendations".to_string(),
                parameters: Map::new(),
                dependencies: vec![1],
            },
        ]
    }
}

impl Default for TemplatePlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Planner for TemplatePlanner {
    async fn generate(
        &self,
        abstract_plan: &AbstractPlan,
        _context: &Map<String, Value>,
        retrieval: Option<&Value>,
        user_text: Option<&str>,
        image_path: Option<&str>,
    ) -> Result<ExecutionPlan, PlannerError> {
        debug!(plan_type = %abstract_plan.plan_type, "TemplatePlanner::generate: called");
        let steps = match abstract_plan.plan_type {
            PlanType::ThreeDGeneration => self.generation_steps(abstract_plan, user_text, image_path),
            PlanType::GarmentRecommendation => self.recommendation_steps(abstract_plan, retrieval, user_text),
        };

        let plan = ExecutionPlan {
            plan_id: Uuid::now_v7().to_string(),
            steps,
        };
        plan.validate()?;

        debug!(plan_id = %plan.plan_id, step_count = plan.steps.len(), "TemplatePlanner::generate: plan ready");
        Ok(plan)
    }
}
