//! The `Tool` trait.

use super::{ToolContext, ToolResult};
use crate::error::ToolError;
use crate::protocol::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;

/// A callable tool exposed over `tools/list` and `tools/call`.
///
/// Arguments reaching [`execute`](Tool::execute) have already been validated
/// against [`input_schema`](Tool::input_schema) by the registry, so an
/// implementation can deserialize them without re-checking shape.
///
/// Returning `Err` surfaces as a JSON-RPC error; a failure the client should
/// read as content belongs in an `Ok(ToolResult)` instead.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> Option<&str> {
        None
    }

    /// JSON Schema describing the accepted arguments
    fn input_schema(&self) -> Value;

    /// Run the tool with validated arguments
    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError>;

    /// Descriptor advertised by `tools/list`
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().map(str::to_string),
            input_schema: self.input_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn input_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn execute(
            &self,
            input: Value,
            _context: &ToolContext,
        ) -> Result<ToolResult, ToolError> {
            let text = input["text"].as_str().unwrap_or_default();
            Ok(ToolResult::success_text(text.to_uppercase()))
        }
    }

    #[test]
    fn test_default_description_is_none() {
        assert_eq!(UpperTool.description(), None);
    }

    #[test]
    fn test_definition() {
        let definition = UpperTool.definition();
        assert_eq!(definition.name, "upper");
        assert!(definition.description.is_none());
        assert_eq!(definition.input_schema["required"], json!(["text"]));
    }

    #[tokio::test]
    async fn test_execute() {
        let result = UpperTool
            .execute(json!({"text": "lace"}), &ToolContext::new())
            .await
            .unwrap();
        assert_eq!(result.content[0].as_text(), "LACE");
    }
}
