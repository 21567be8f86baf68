//! Thread-safe tool registry with input validation.

use std::collections::BTreeMap;
use std::sync::Arc;

use jsonschema::Validator;
use parking_lot::RwLock;
use serde_json::Value;

use super::{Tool, ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;

#[derive(Clone)]
struct Entry {
    tool: Arc<dyn Tool>,
    validator: Arc<Validator>,
}

/// Registry of tools keyed by name.
///
/// Each tool's input schema is compiled once at registration; [`call`](Self::call)
/// checks the arguments against it before the tool runs. Cloning the registry
/// shares the underlying storage.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// # Errors
    ///
    /// [`ToolError::AlreadyRegistered`] when the name is taken,
    /// [`ToolError::InvalidSchema`] when the input schema does not compile.
    pub fn register<T: Tool + 'static>(&self, tool: T) -> Result<(), ToolError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool.
    pub fn register_arc(&self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        let schema = tool.input_schema();
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| ToolError::InvalidSchema {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        let mut tools = self.tools.write();
        if tools.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }
        tracing::debug!(tool = %name, "Registered tool");
        tools.insert(
            name,
            Entry {
                tool,
                validator: Arc::new(validator),
            },
        );
        Ok(())
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).map(|entry| entry.tool.clone())
    }

    /// Whether a tool with this name exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.read().contains_key(name)
    }

    /// Definitions of all tools, ordered by name
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools
            .read()
            .values()
            .map(|entry| entry.tool.definition())
            .collect()
    }

    /// Number of registered tools
    pub fn count(&self) -> usize {
        self.tools.read().len()
    }

    /// Validate `input` against the tool's schema and execute it.
    ///
    /// Absent arguments are treated as an empty object so that `required`
    /// properties are still enforced.
    pub async fn call(
        &self,
        name: &str,
        input: Value,
        context: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let entry = self
            .tools
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let input = match input {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let violations: Vec<String> = entry
            .validator
            .iter_errors(&input)
            .map(|e| e.to_string())
            .collect();
        if !violations.is_empty() {
            return Err(ToolError::InvalidInput(violations.join("; ")));
        }

        entry.tool.execute(input, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct TestTool {
        name: String,
    }

    impl TestTool {
        fn new(name: impl Into<String>) -> Self {
            Self { name: name.into() }
        }
    }

    #[async_trait]
    impl Tool for TestTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> Option<&str> {
            Some("A test tool")
        }

        fn input_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            })
        }

        async fn execute(
            &self,
            input: Value,
            context: &ToolContext,
        ) -> Result<ToolResult, ToolError> {
            let query = input["query"].as_str().unwrap_or_default();
            let session = context.session_id().unwrap_or("-");
            Ok(ToolResult::success_text(format!("{session}:{query}")))
        }
    }

    struct BrokenSchemaTool;

    #[async_trait]
    impl Tool for BrokenSchemaTool {
        fn name(&self) -> &str {
            "broken"
        }

        fn input_schema(&self) -> Value {
            json!({"type": 12})
        }

        async fn execute(
            &self,
            _input: Value,
            _context: &ToolContext,
        ) -> Result<ToolResult, ToolError> {
            unreachable!("never registered")
        }
    }

    #[test]
    fn test_registry_new() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_register_duplicate_tool() {
        let registry = ToolRegistry::new();
        registry.register(TestTool::new("duplicate")).unwrap();

        match registry.register(TestTool::new("duplicate")) {
            Err(ToolError::AlreadyRegistered(name)) => assert_eq!(name, "duplicate"),
            other => panic!("Expected AlreadyRegistered error, got {other:?}"),
        }
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_register_rejects_invalid_schema() {
        let registry = ToolRegistry::new();
        let result = registry.register(BrokenSchemaTool);
        assert!(matches!(result, Err(ToolError::InvalidSchema { .. })));
        assert!(!registry.has("broken"));
    }

    #[test]
    fn test_list_is_sorted_by_name() {
        let registry = ToolRegistry::new();
        registry.register(TestTool::new("zeta")).unwrap();
        registry.register(TestTool::new("alpha")).unwrap();

        let names: Vec<_> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = ToolRegistry::new();
        let clone = registry.clone();
        registry.register(TestTool::new("shared")).unwrap();
        assert!(clone.has("shared"));
        assert!(clone.get("shared").is_some());
    }

    #[tokio::test]
    async fn test_call_passes_context() {
        let registry = ToolRegistry::new();
        registry.register(TestTool::new("lookup")).unwrap();

        let context = ToolContext::builder().session_id("s1").build();
        let result = registry
            .call("lookup", json!({"query": "trim"}), &context)
            .await
            .unwrap();
        assert_eq!(result.content[0].as_text(), "s1:trim");
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.call("missing", json!({}), &ToolContext::new()).await;
        assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_call_validates_arguments() {
        let registry = ToolRegistry::new();
        registry.register(TestTool::new("lookup")).unwrap();

        let wrong_type = registry
            .call("lookup", json!({"query": 42}), &ToolContext::new())
            .await;
        assert!(matches!(wrong_type, Err(ToolError::InvalidInput(_))));

        let missing = registry.call("lookup", Value::Null, &ToolContext::new()).await;
        match missing {
            Err(ToolError::InvalidInput(message)) => assert!(message.contains("query")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_string_is_valid_input() {
        let registry = ToolRegistry::new();
        registry.register(TestTool::new("lookup")).unwrap();

        let result = registry
            .call("lookup", json!({"query": ""}), &ToolContext::new())
            .await
            .unwrap();
        assert_eq!(result.content[0].as_text(), "-:");
    }
}
