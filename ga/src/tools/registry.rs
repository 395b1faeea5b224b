//! Tool trait and registry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use super::{ExecutionContext, ToolError};

/// A pluggable capability execution steps dispatch to
///
/// One fixed calling convention for every tool: an action name selecting
/// the sub-operation, opaque JSON parameters, and the mutable per-pass
/// context. Failures surface as [`ToolError`]; the executor stringifies
/// them without looking at the variant.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key this tool is looked up under
    fn name(&self) -> &str;

    /// Run one action
    async fn invoke(
        &self,
        action: &str,
        parameters: &Map<String, Value>,
        context: &mut ExecutionContext,
    ) -> Result<Value, ToolError>;
}

/// Name-to-capability lookup table
///
/// Built once at startup and handed to the orchestrator/executor
/// explicitly - there is no ambient global registry.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the builtin garment tools
    pub fn with_builtins() -> Self {
        debug!("ToolRegistry::with_builtins: called");
        let mut registry = Self::new();
        registry.register(super::builtin::GarmentPipelineTool::new());
        registry.register(super::builtin::ProductSearchTool::new());
        registry
    }

    /// Register a tool under its own name (replaces any previous entry)
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        debug!(%name, "ToolRegistry::register: called");
        self.tools.insert(name, Arc::new(tool));
    }

    /// Look up a tool by registry key
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Whether a tool is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All registered tool names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(
            &self,
            action: &str,
            _parameters: &Map<String, Value>,
            _context: &mut ExecutionContext,
        ) -> Result<Value, ToolError> {
            Ok(json!({"echo": action}))
        }
    }

    #[tokio::test]
    async fn test_register_and_invoke() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let tool = registry.get("echo").expect("registered tool");
        let mut ctx = ExecutionContext::new();
        let result = tool.invoke("ping", &Map::new(), &mut ctx).await.unwrap();
        assert_eq!(result, json!({"echo": "ping"}));
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let registry = ToolRegistry::new();
        assert!(registry.get("nope").is_none());
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn test_with_builtins_registers_both_families() {
        let registry = ToolRegistry::with_builtins();
        assert!(registry.contains("extensions_2d_to_3d"));
        assert!(registry.contains("function_product_search"));
        assert_eq!(registry.names().len(), 2);
    }
}
