//! Tool result type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{CallToolResult, ToolContent};

/// Content produced by a tool call.
///
/// ```
/// use mcp_server::tool::ToolResult;
/// use serde_json::json;
///
/// let result = ToolResult::success_json(json!({"sku": "AP-12"}));
/// assert_eq!(result.content[0].as_text(), r#"{"sku":"AP-12"}"#);
/// assert!(result.is_success());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    /// Content blocks
    pub content: Vec<ToolContent>,

    /// Set to `Some(true)` when the content describes a failure
    #[serde(skip_serializing_if = "Option::is_none", rename = "isError")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    /// Successful result with the given blocks
    pub fn success(content: Vec<ToolContent>) -> Self {
        Self {
            content,
            is_error: None,
        }
    }

    /// Successful result with one text block
    pub fn success_text(text: impl Into<String>) -> Self {
        Self::success(vec![ToolContent::text(text)])
    }

    /// Successful result with one text block holding compact JSON
    pub fn success_json(value: Value) -> Self {
        Self::success_text(value.to_string())
    }

    /// Failed result with one text block, flagged with `isError`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(message)],
            is_error: Some(true),
        }
    }

    /// Whether `isError` is set
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Inverse of [`is_error`](Self::is_error)
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        CallToolResult {
            content: result.content,
            is_error: result.is_error,
        }
    }
}
