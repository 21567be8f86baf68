//! JSON-RPC 2.0 request envelope.
//!
//! A request carries `jsonrpc` (always `"2.0"`), a `method`, optional `params`
//! and an optional `id`. A request without an `id` is a notification and must
//! not be answered.
//!
//! ```
//! use mcp_server::protocol::JsonRpcRequest;
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new(
//!     Some(json!(1)),
//!     "tools/call".to_string(),
//!     Some(json!({"name": "getAppliqueComponentDetails", "arguments": {"query": "lace"}})),
//! );
//! assert!(!request.is_notification());
//!
//! let notification = JsonRpcRequest::notification("notifications/initialized".to_string(), None);
//! assert!(notification.is_notification());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::JsonRpcError;

/// JSON-RPC 2.0 Request object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// JSON-RPC protocol version (must be "2.0")
    pub jsonrpc: String,

    /// Request identifier (if None, this is a notification)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Method name to invoke
    pub method: String,

    /// Method parameters (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request
    ///
    /// # Arguments
    ///
    /// * `id` - Request identifier (None for notifications)
    /// * `method` - Method name
    /// * `params` - Optional parameters
    pub fn new(id: Option<Value>, method: String, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method,
            params,
        }
    }

    /// Create a new JSON-RPC notification (request without an id)
    pub fn notification(method: String, params: Option<Value>) -> Self {
        Self::new(None, method, params)
    }

    /// Check if this request is a notification
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Parse one wire frame into a request.
    ///
    /// Text that is not JSON, or JSON that is not a request object, yields a
    /// parse error (-32700). A well-formed object with the wrong `jsonrpc`
    /// version yields an invalid request error (-32600).
    ///
    /// ```
    /// use mcp_server::protocol::{codes, JsonRpcRequest};
    ///
    /// let request = JsonRpcRequest::parse(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
    /// assert_eq!(request.method, "ping");
    ///
    /// let error = JsonRpcRequest::parse("not json").unwrap_err();
    /// assert_eq!(error.code, codes::PARSE_ERROR);
    /// ```
    pub fn parse(text: &str) -> Result<Self, JsonRpcError> {
        let request: Self = serde_json::from_str(text)
            .map_err(|e| JsonRpcError::parse_error(Some(e.to_string())))?;
        request.validate()?;
        Ok(request)
    }

    /// Check envelope-level invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), JsonRpcError> {
        if self.jsonrpc != "2.0" {
            return Err(JsonRpcError::invalid_request(Some(format!(
                "unsupported jsonrpc version '{}'",
                self.jsonrpc
            ))));
        }
        if self.method.is_empty() {
            return Err(JsonRpcError::invalid_request(Some(
                "method must not be empty".to_string(),
            )));
        }
        Ok(())
    }
}
