//! Knowledge retrieval boundary
//!
//! The planner can be primed with ranked supporting facts about garments
//! (types, styles, materials, color guidelines). Retrieval is consumed as
//! an interface; [`StaticKnowledgeBase`] is the builtin in-memory
//! implementation, and a vector-store implementation can replace it
//! without the core noticing.

mod knowledge;

pub use knowledge::StaticKnowledgeBase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::PlanType;

/// One matched fact from the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Table the fact came from (e.g. "styles")
    pub category: String,
    /// Matched key within the table
    pub key: String,
    /// The fact itself
    pub value: Value,
}

/// Ranked supporting facts for one query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalContext {
    /// Matched facts, in table order
    pub suggestions: Vec<Suggestion>,
    /// Full tables that produced at least one match
    pub relevant_info: Map<String, Value>,
    /// Crude relevance score in [0, 1]
    pub confidence: f64,
}

/// Query interface over the garment knowledge base
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Fetch facts matching the query
    async fn retrieve(&self, query: &str) -> RetrievalContext;

    /// Shape a retrieval result for the planner, per plan family
    async fn context_for_plan(&self, plan_type: PlanType, user_input: &str) -> Value {
        let results = self.retrieve(user_input).await;
        match plan_type {
            PlanType::ThreeDGeneration => json!({
                "rag_suggestions": results.suggestions,
                "garment_info": results.relevant_info,
                "confidence": results.confidence,
            }),
            PlanType::GarmentRecommendation => json!({
                "rag_suggestions": results.suggestions,
                "style_info": results.relevant_info.get("styles").cloned().unwrap_or_else(|| Value::Object(Map::new())),
                "confidence": results.confidence,
            }),
        }
    }
}
