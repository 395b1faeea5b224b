//! Image-to-3D garment pipeline tool (mock backend)

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::upstream_result;
use crate::tools::{ExecutionContext, Tool, ToolError};

/// Registry key for the pipeline tool
pub const GARMENT_PIPELINE_TOOL: &str = "extensions_2d_to_3d";

/// 2D-image-to-3D-try-on pipeline
///
/// Actions: `analyze_image`, `generate_pattern`, `convert_to_3d`,
/// `render_result`, and `process_request` (the full chain in one call).
/// Each chained action consumes the previous stage's output via
/// `_dependency_result` or the `step_{id}` context keys.
pub struct GarmentPipelineTool;

impl GarmentPipelineTool {
    pub fn new() -> Self {
        Self
    }

    fn analyze_image(&self, parameters: &Map<String, Value>, context: &ExecutionContext) -> Result<Value, ToolError> {
        debug!("GarmentPipelineTool::analyze_image: called");
        let image_path = parameters
            .get("image_path")
            .or_else(|| context.get("image_path"))
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ToolError::MissingInput("이미지 경로가 필요합니다.".to_string()))?;

        Ok(json!({
            "status": "success",
            "analysis": {
                "garment_type": "상의",
                "style": "캐주얼",
                "color": "검정색",
                "type": "hoodie"
            },
            "image_path": image_path,
            "message": "이미지 분석이 완료되었습니다."
        }))
    }

    fn generate_pattern(&self, parameters: &Map<String, Value>, context: &ExecutionContext) -> Result<Value, ToolError> {
        debug!("GarmentPipelineTool::generate_pattern: called");
        let analysis = upstream_result(parameters, context, 1)
            .ok_or_else(|| ToolError::MissingInput("이미지 분석 결과가 필요합니다.".to_string()))?;

        let garment_type = analysis
            .get("analysis")
            .and_then(|a| a.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("hoodie")
            .to_string();

        Ok(json!({
            "status": "success",
            "pattern_path": "outputs/patterns/pattern.json",
            "pattern_info": {
                "type": garment_type,
                "components": ["front", "back", "sleeves", "hood"]
            },
            "message": "패턴 생성이 완료되었습니다."
        }))
    }

    fn convert_to_3d(&self, parameters: &Map<String, Value>, context: &ExecutionContext) -> Result<Value, ToolError> {
        debug!("GarmentPipelineTool::convert_to_3d: called");
        // A missing pattern result is tolerated here: the pipeline degrades
        // to its mock mesh instead of failing the step.
        let pattern = upstream_result(parameters, context, 2);
        if pattern.is_none() {
            debug!("GarmentPipelineTool::convert_to_3d: no pattern result, using mock mesh");
        }

        Ok(json!({
            "status": "success",
            "mesh_path": "outputs/3d_models/garment.obj",
            "mesh_info": {
                "vertices": 8,
                "faces": 6,
                "format": "obj"
            },
            "message": "3D 변환이 완료되었습니다."
        }))
    }

    fn render_result(&self, parameters: &Map<String, Value>, context: &ExecutionContext) -> Result<Value, ToolError> {
        debug!("GarmentPipelineTool::render_result: called");
        let mesh = upstream_result(parameters, context, 3)
            .ok_or_else(|| ToolError::MissingInput("3D 모델 결과가 필요합니다.".to_string()))?;

        let mesh_path = mesh.get("mesh_path").cloned().unwrap_or(Value::Null);
        let render_path = "outputs/renders/garment_render.png";

        Ok(json!({
            "status": "success",
            "render_path": render_path,
            "visualization": {
                "image_path": render_path,
                "mesh_path": mesh_path
            },
            "message": "렌더링이 완료되었습니다."
        }))
    }

    /// Full pipeline in one action, threading stage results through the
    /// context exactly like a four-step plan would.
    fn process_request(&self, parameters: &Map<String, Value>, context: &mut ExecutionContext) -> Result<Value, ToolError> {
        debug!("GarmentPipelineTool::process_request: called");
        let analysis = self.analyze_image(parameters, context)?;
        context.insert("step_1", analysis.clone());

        let pattern = self.generate_pattern(parameters, context)?;
        context.insert("step_2", pattern.clone());

        let mesh = self.convert_to_3d(parameters, context)?;
        context.insert("step_3", mesh.clone());

        let render = self.render_result(parameters, context)?;

        Ok(json!({
            "status": "success",
            "pipeline_complete": true,
            "steps": {
                "analysis": analysis,
                "pattern": pattern,
                "3d_conversion": mesh,
                "render": render.clone()
            },
            "final_result": render,
            "message": "전체 파이프라인이 완료되었습니다."
        }))
    }
}

impl Default for GarmentPipelineTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GarmentPipelineTool {
    fn name(&self) -> &str {
        GARMENT_PIPELINE_TOOL
    }

    async fn invoke(
        &self,
        action: &str,
        parameters: &Map<String, Value>,
        context: &mut ExecutionContext,
    ) -> Result<Value, ToolError> {
        debug!(%action, "GarmentPipelineTool::invoke: called");
        match action {
            "analyze_image" => self.analyze_image(parameters, context),
            "generate_pattern" => self.generate_pattern(parameters, context),
            "convert_to_3d" => self.convert_to_3d(parameters, context),
            "render_result" => self.render_result(parameters, context),
            "process_request" => self.process_request(parameters, context),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}
