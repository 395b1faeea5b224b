//! Orchestrator - top-level request processing
//!
//! One request runs the full sequence to completion: resolve session →
//! classify intent → build abstract plan → generate execution plan →
//! execute under self-correction → record the exchange in session memory.
//! Business-logic failure is data (`status: failed` in the FinalResult);
//! only planner failure crosses this boundary as an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{debug, info};

use sessionstore::SessionStore;

use crate::correction::SelfCorrection;
use crate::domain::{AbstractPlan, FinalResult, Intent, IntentKind, PlanType};
use crate::executor::PlanExecutor;
use crate::intent::classify_intent;
use crate::planner::{Planner, PlannerError};
use crate::retrieval::KnowledgeRetriever;
use crate::tools::ToolRegistry;

/// Session id used when neither the call nor the payload names one
pub const DEFAULT_SESSION_ID: &str = "default";

/// Request inputs: free text and/or an uploaded garment image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputData {
    /// What the user typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Where the uploaded image landed (opaque to the core)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Whether an image accompanies the request
    #[serde(default)]
    pub has_image: bool,
}

/// One inbound request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPayload {
    /// User inputs
    #[serde(default)]
    pub input_data: InputData,

    /// Session the request belongs to, if the transport layer knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Infrastructure failures that escape `process_request`
#[derive(Debug, Error)]
pub enum AgentError {
    /// The planning backend failed; the caller owns handling this
    #[error("Plan generation failed: {0}")]
    Planner(#[from] PlannerError),
}

/// Build the tool-agnostic plan for a classified intent.
///
/// The phase lists and goals are fixed per intent kind; parameters carry
/// the raw request inputs the planner will bind into steps.
pub fn build_abstract_plan(intent: &Intent, input: &InputData) -> AbstractPlan {
    debug!(kind = %intent.kind, "build_abstract_plan: called");
    match intent.kind {
        IntentKind::Generation => {
            let mut parameters = Map::new();
            parameters.insert(
                "image_path".to_string(),
                input.image_path.clone().map(Value::from).unwrap_or(Value::Null),
            );
            parameters.insert(
                "text".to_string(),
                input.text.clone().map(Value::from).unwrap_or(Value::Null),
            );
            AbstractPlan::new(
                PlanType::ThreeDGeneration,
                "2D 이미지를 3D 가상 피팅으로 변환",
                vec![
                    "의류 이미지 분석".to_string(),
                    "3D 패턴 생성".to_string(),
                    "3D 모델 변환".to_string(),
                    "렌더링 및 시각화".to_string(),
                ],
                parameters,
            )
        }
        IntentKind::Recommendation => {
            let mut parameters = Map::new();
            parameters.insert(
                "query".to_string(),
                input.text.clone().map(Value::from).unwrap_or(Value::Null),
            );
            parameters.insert("filters".to_string(), json!({}));
            AbstractPlan::new(
                PlanType::GarmentRecommendation,
                "사용자 요청에 맞는 의상 추천",
                vec![
                    "상품 검색".to_string(),
                    "매칭 및 필터링".to_string(),
                    "추천 결과 반환".to_string(),
                ],
                parameters,
            )
        }
    }
}

/// Composes the planning/execution/self-correction pipeline
///
/// Collaborators are injected at construction; nothing here is global
/// state. The orchestrator is `&self` throughout and safe to share across
/// in-flight requests - the session store is the only cross-request
/// mutable state and carries its own locks.
pub struct Orchestrator {
    planner: Arc<dyn Planner>,
    executor: PlanExecutor,
    retriever: Option<Arc<dyn KnowledgeRetriever>>,
    correction: SelfCorrection,
    sessions: Arc<SessionStore>,
}

impl Orchestrator {
    /// Create an orchestrator over a planner and a tool registry
    pub fn new(planner: Arc<dyn Planner>, registry: Arc<ToolRegistry>) -> Self {
        debug!("Orchestrator::new: called");
        Self {
            planner,
            executor: PlanExecutor::new(registry),
            retriever: None,
            correction: SelfCorrection::default(),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Attach a knowledge retriever (absent by default)
    pub fn with_retriever(mut self, retriever: Arc<dyn KnowledgeRetriever>) -> Self {
        debug!("Orchestrator::with_retriever: called");
        self.retriever = Some(retriever);
        self
    }

    /// Override the retry bound (default: one retry)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        debug!(max_retries, "Orchestrator::with_max_retries: called");
        self.correction = SelfCorrection::new(max_retries);
        self
    }

    /// Use a shared session store instead of a private one
    pub fn with_sessions(mut self, sessions: Arc<SessionStore>) -> Self {
        debug!("Orchestrator::with_sessions: called");
        self.sessions = sessions;
        self
    }

    /// The session store backing this orchestrator
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Process one request to completion.
    ///
    /// `session_id` wins over `payload.session_id`; with neither present
    /// the request lands in the `"default"` session.
    pub async fn process_request(
        &self,
        payload: RequestPayload,
        session_id: Option<&str>,
    ) -> Result<FinalResult, AgentError> {
        let session_id = session_id
            .map(str::to_string)
            .or_else(|| payload.session_id.clone())
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
        debug!(%session_id, "Orchestrator::process_request: called");

        let session = self.sessions.get_or_create(&session_id).await;
        let input = &payload.input_data;
        let text = input.text.clone().unwrap_or_default();

        let intent = classify_intent(&text, input.has_image);
        info!("Request classified as {} (session {})", intent.kind, session_id);

        let abstract_plan = build_abstract_plan(&intent, input);

        let retrieval = match &self.retriever {
            Some(retriever) => Some(retriever.context_for_plan(abstract_plan.plan_type, &text).await),
            None => None,
        };

        let context = input_context(input);
        let plan = self
            .planner
            .generate(
                &abstract_plan,
                &context,
                retrieval.as_ref(),
                input.text.as_deref(),
                input.image_path.as_deref(),
            )
            .await?;
        debug!(plan_id = %plan.plan_id, "Orchestrator::process_request: plan generated");

        // Snapshot the session context for the executor; the guard is not
        // held across tool calls.
        let shared: Map<String, Value> = {
            let memory = session.lock().await;
            memory.context().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        let first_pass = self.executor.execute(&plan, &shared).await;
        let final_result = self.correction.run(&self.executor, &plan, &shared, first_pass).await;

        session.lock().await.add_conversation(
            text,
            final_result.message.clone(),
            json!({"plan_id": plan.plan_id}),
        );

        info!(
            "Request complete: plan {} finished with status {}",
            plan.plan_id, final_result.status
        );
        Ok(final_result)
    }
}

/// Flatten the request inputs into the planner's ambient context map
fn input_context(input: &InputData) -> Map<String, Value> {
    match serde_json::to_value(input) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
