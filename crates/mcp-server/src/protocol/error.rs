//! JSON-RPC 2.0 error objects and the error codes used on the wire.
//!
//! # Standard JSON-RPC Error Codes
//!
//! - `-32700`: Parse error - Invalid JSON
//! - `-32600`: Invalid Request - The JSON sent is not a valid Request object
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! # MCP-Specific Error Codes
//!
//! - `-32000`: Server error
//! - `-32002`: Connection error (no usable session)
//! - `-32004`: Tool not found
//! - `-32005`: Tool execution failed

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    /// Parse error - Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;

    /// Invalid Request - The JSON sent is not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;

    /// Method not found - The method does not exist / is not available
    pub const METHOD_NOT_FOUND: i32 = -32601;

    /// Invalid params - Invalid method parameter(s)
    pub const INVALID_PARAMS: i32 = -32602;

    /// Internal error - Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes (implementation-defined range)
pub mod mcp_codes {
    /// Generic server-side error
    pub const SERVER_ERROR: i32 = -32000;

    /// No usable session or connection
    pub const CONNECTION_ERROR: i32 = -32002;

    /// Requested tool does not exist
    pub const TOOL_NOT_FOUND: i32 = -32004;

    /// Tool execution failed
    pub const TOOL_EXECUTION_FAILED: i32 = -32005;
}

/// JSON-RPC 2.0 error object
///
/// ```
/// use mcp_server::protocol::JsonRpcError;
///
/// let error = JsonRpcError::invalid_params("Missing required field 'query'");
/// assert_eq!(error.code, -32602);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code indicating the error type
    pub code: i32,

    /// Short description of the error
    pub message: String,

    /// Additional information about the error (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new JSON-RPC error
    pub fn new(code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            code,
            message,
            data,
        }
    }

    /// Create a parse error (-32700)
    pub fn parse_error(details: Option<String>) -> Self {
        Self {
            code: codes::PARSE_ERROR,
            message: "Parse error".to_string(),
            data: details.map(Value::String),
        }
    }

    /// Create an invalid request error (-32600)
    pub fn invalid_request(details: Option<String>) -> Self {
        Self {
            code: codes::INVALID_REQUEST,
            message: "Invalid Request".to_string(),
            data: details.map(Value::String),
        }
    }

    /// Create a method not found error (-32601)
    pub fn method_not_found() -> Self {
        Self {
            code: codes::METHOD_NOT_FOUND,
            message: "Method not found".to_string(),
            data: None,
        }
    }

    /// Create an invalid params error (-32602)
    pub fn invalid_params(details: &str) -> Self {
        Self {
            code: codes::INVALID_PARAMS,
            message: "Invalid params".to_string(),
            data: Some(Value::String(details.to_string())),
        }
    }

    /// Create an internal error (-32603)
    pub fn internal_error(details: Option<String>) -> Self {
        Self {
            code: codes::INTERNAL_ERROR,
            message: "Internal error".to_string(),
            data: details.map(Value::String),
        }
    }

    /// Create a connection error (-32002), used when no session can take a message
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self {
            code: mcp_codes::CONNECTION_ERROR,
            message: message.into(),
            data: None,
        }
    }

    /// Create a tool not found error (-32004)
    ///
    /// ```
    /// use mcp_server::protocol::JsonRpcError;
    ///
    /// let error = JsonRpcError::tool_not_found("calculate");
    /// assert_eq!(error.code, -32004);
    /// assert_eq!(error.message, "Tool 'calculate' not found");
    /// ```
    pub fn tool_not_found(tool_name: &str) -> Self {
        Self {
            code: mcp_codes::TOOL_NOT_FOUND,
            message: format!("Tool '{}' not found", tool_name),
            data: None,
        }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC Error {}: {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            write!(f, " (data: {})", data)?;
        }
        Ok(())
    }
}

impl std::error::Error for JsonRpcError {}

/// Convert `ToolError` to `JsonRpcError`
impl From<ToolError> for JsonRpcError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::NotFound(name) => JsonRpcError::tool_not_found(&name),
            ToolError::InvalidInput(details) => JsonRpcError::invalid_params(&details),
            ToolError::ExecutionFailed(msg) => JsonRpcError::new(
                mcp_codes::TOOL_EXECUTION_FAILED,
                format!("Tool execution failed: {}", msg),
                None,
            ),
            error @ (ToolError::AlreadyRegistered(_) | ToolError::InvalidSchema { .. }) => {
                JsonRpcError::new(mcp_codes::SERVER_ERROR, error.to_string(), None)
            }
            ToolError::Internal(e) => JsonRpcError::internal_error(Some(e.to_string())),
        }
    }
}
