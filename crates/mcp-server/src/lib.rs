//! # MCP Server Plumbing
//!
//! A small, type-safe crate for exposing tools over the Model Context Protocol (MCP).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_server::prelude::*;
//!
//! struct EchoTool;
//!
//! #[async_trait]
//! impl Tool for EchoTool {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     fn input_schema(&self) -> Value {
//!         json!({
//!             "type": "object",
//!             "properties": { "message": { "type": "string" } },
//!             "required": ["message"]
//!         })
//!     }
//!
//!     async fn execute(
//!         &self,
//!         input: Value,
//!         _ctx: &ToolContext,
//!     ) -> std::result::Result<ToolResult, ToolError> {
//!         Ok(ToolResult::success_text(input["message"].as_str().unwrap_or_default()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     McpServer::builder()
//!         .name("echo-server")
//!         .version("1.0.0")
//!         .tool(EchoTool)
//!         .build()?
//!         .serve(StdioTransport::new())
//!         .await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`protocol`]: JSON-RPC envelopes and MCP message types
//! - [`tool`]: Tool trait, registry and results
//! - [`transport`]: Transport trait with stdio, SSE and mock implementations
//! - [`server`]: Request dispatch and the per-session serve loop
//! - [`error`]: Error types and conversions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod prelude;
pub mod protocol;
pub mod server;
pub mod tool;
pub mod transport;

pub use error::{McpError, Result, ToolError, TransportError};
pub use protocol::{JsonRpcRequest, JsonRpcResponse};
pub use server::{McpServer, ServerBuilder, ServerConfig};
pub use tool::{Tool, ToolContext, ToolResult};
pub use transport::Transport;

/// Protocol version announced when the client does not ask for a supported one.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Protocol versions this crate can speak, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-03-26", "2024-11-05"];

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
