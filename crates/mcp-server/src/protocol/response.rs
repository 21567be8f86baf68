//! JSON-RPC 2.0 response envelope.
//!
//! A response carries either `result` or `error`, never both, and echoes the
//! `id` of the request it answers (`null` when the request id could not be
//! determined, e.g. on a parse error).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::JsonRpcError;

/// JSON-RPC 2.0 Response object
///
/// ```
/// use mcp_server::protocol::JsonRpcResponse;
/// use serde_json::json;
///
/// let response = JsonRpcResponse::success(Some(json!(1)), json!({"tools": []}));
/// assert!(response.is_success());
///
/// let response = JsonRpcResponse::method_not_found(Some(json!(2)));
/// assert!(response.is_error());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// JSON-RPC protocol version (always "2.0")
    pub jsonrpc: String,

    /// Identifier of the request being answered
    pub id: Option<Value>,

    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Method not found (-32601)
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, JsonRpcError::method_not_found())
    }

    /// Invalid params (-32602)
    pub fn invalid_params(id: Option<Value>, details: &str) -> Self {
        Self::error(id, JsonRpcError::invalid_params(details))
    }

    /// Internal error (-32603)
    pub fn internal_error(id: Option<Value>, details: Option<String>) -> Self {
        Self::error(id, JsonRpcError::internal_error(details))
    }

    /// Parse error (-32700). The id is always `null`.
    pub fn parse_error(details: Option<String>) -> Self {
        Self::error(None, JsonRpcError::parse_error(details))
    }

    /// Tool not found (-32004)
    pub fn tool_not_found(id: Option<Value>, tool_name: &str) -> Self {
        Self::error(id, JsonRpcError::tool_not_found(tool_name))
    }

    /// Check if this response represents success
    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Check if this response represents an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
