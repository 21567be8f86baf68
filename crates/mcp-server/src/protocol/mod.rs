//! MCP protocol types.
//!
//! - [`request`]: JSON-RPC 2.0 request envelope and frame parsing
//! - [`response`]: JSON-RPC 2.0 response envelope with helper constructors
//! - [`error`]: JSON-RPC error object and MCP error codes
//! - [`types`]: MCP payloads (initialize, tools list/call, content blocks)
//!
//! ```
//! use mcp_server::protocol::{CallToolResult, JsonRpcResponse, ToolContent};
//! use serde_json::json;
//!
//! let result = CallToolResult {
//!     content: vec![ToolContent::text("Operation completed successfully")],
//!     is_error: None,
//! };
//!
//! let response = JsonRpcResponse::success(Some(json!(1)), serde_json::to_value(result).unwrap());
//! assert!(response.is_success());
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod types;

pub use error::{codes, mcp_codes, JsonRpcError};
pub use request::JsonRpcRequest;
pub use response::JsonRpcResponse;
pub use types::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolContent, ToolDefinition,
    ToolsCapability,
};
