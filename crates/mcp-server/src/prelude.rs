//! Convenient re-exports for common use cases.
//!
//! ```rust
//! use mcp_server::prelude::*;
//! ```

// Core types
pub use crate::error::{McpError, Result, ToolError, TransportError};
pub use crate::protocol::{
    CallToolParams, CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ServerInfo, ToolContent, ToolDefinition,
};

// Tool system
pub use crate::tool::{Tool, ToolContext, ToolRegistry, ToolResult};

// Transport
pub use crate::transport::{StdioTransport, Transport};

#[cfg(feature = "sse")]
pub use crate::transport::{SessionAcceptor, SseBinding, SseOptions, SseTransport};

// Server
pub use crate::server::{McpServer, ServerBuilder, ServerConfig};

// External re-exports for convenience
pub use async_trait::async_trait;
pub use serde_json::{json, Value};
