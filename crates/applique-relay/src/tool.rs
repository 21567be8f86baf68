//! The `getAppliqueComponentDetails` tool.

use std::sync::Arc;

use async_trait::async_trait;
use mcp_server::prelude::*;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::forwarder::{BackendResult, ForwardError, QueryForwarder};

pub const TOOL_NAME: &str = "getAppliqueComponentDetails";

/// Text returned when the backend answers with an empty response.
pub const EMPTY_RESPONSE_TEXT: &str = "No response found.";

/// Text returned when the backend could not be queried.
pub const FETCH_ERROR_TEXT: &str = "Error occurred while fetching data.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ComponentQuery {
    /// Free-text question about an Applique component
    pub query: String,
}

/// Relays a query to the component backend and returns its answer as text.
///
/// Backend failures are reported inside the content block, never as a
/// JSON-RPC error.
pub struct AppliqueComponentTool {
    forwarder: Arc<QueryForwarder>,
}

impl AppliqueComponentTool {
    pub fn new(forwarder: Arc<QueryForwarder>) -> Self {
        Self { forwarder }
    }
}

/// Render a forwarder outcome as the tool's text.
pub fn render(outcome: std::result::Result<BackendResult, ForwardError>) -> String {
    match outcome {
        Ok(BackendResult::Unwrapped(text)) if text.is_empty() => EMPTY_RESPONSE_TEXT.to_string(),
        Ok(BackendResult::Unwrapped(text)) => text,
        Ok(BackendResult::Structured(value)) => value.to_string(),
        Err(_) => FETCH_ERROR_TEXT.to_string(),
    }
}

#[async_trait]
impl Tool for AppliqueComponentTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Look up details about Applique components from the component knowledge base")
    }

    fn input_schema(&self) -> Value {
        schemars::schema_for!(ComponentQuery).to_value()
    }

    async fn execute(
        &self,
        input: Value,
        context: &ToolContext,
    ) -> std::result::Result<ToolResult, ToolError> {
        let ComponentQuery { query } = serde_json::from_value(input)?;

        tracing::info!(
            session_id = ?context.session_id(),
            request_id = ?context.request_id(),
            "Fetching component details"
        );

        let outcome = self.forwarder.forward(&query).await;
        Ok(ToolResult::success_text(render(outcome)))
    }
}
