//! Error types for the MCP server plumbing.
//!
//! # Error Hierarchy
//!
//! ```text
//! McpError (top-level)
//! ├── Transport(TransportError)
//! ├── Tool(ToolError)
//! └── Config(String)
//! ```
//!
//! Tool errors are the only ones that travel back to clients; they convert into a
//! [`JsonRpcError`](crate::protocol::JsonRpcError) with the matching JSON-RPC or
//! MCP error code.

use thiserror::Error;

/// Result type alias for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum McpError {
    /// Transport-layer error (I/O, connection issues).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Tool registration or execution error.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Server configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Tool-specific errors.
///
/// ```rust
/// use mcp_server::error::ToolError;
///
/// let error = ToolError::NotFound("nonexistent_tool".to_string());
/// assert_eq!(error.to_string(), "Tool not found: nonexistent_tool");
/// ```
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found in the registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    /// The tool's declared input schema could not be compiled.
    #[error("Invalid input schema for tool '{name}': {reason}")]
    InvalidSchema {
        /// Tool name
        name: String,
        /// Compiler message
        reason: String,
    },

    /// Arguments failed schema validation or deserialization.
    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    /// Tool execution failed.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Catch-all for unexpected errors during tool operations.
    #[error("Internal tool error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ToolError {
    fn from(error: serde_json::Error) -> Self {
        ToolError::InvalidInput(error.to_string())
    }
}

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error while reading from or writing to the underlying streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport (or its peer) has been closed.
    #[error("Connection closed")]
    Closed,

    /// A message could not be serialized or parsed.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}
