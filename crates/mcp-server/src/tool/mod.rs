//! Tool system: the [`Tool`] trait, the validating [`ToolRegistry`], and the
//! per-call [`ToolContext`] and [`ToolResult`] types.
//!
//! ```
//! use mcp_server::error::ToolError;
//! use mcp_server::tool::{Tool, ToolContext, ToolRegistry, ToolResult};
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
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
//!         _context: &ToolContext,
//!     ) -> Result<ToolResult, ToolError> {
//!         Ok(ToolResult::success_text(input["message"].as_str().unwrap_or_default()))
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = ToolRegistry::new();
//! registry.register(EchoTool).unwrap();
//!
//! let result = registry
//!     .call("echo", json!({"message": "hi"}), &ToolContext::new())
//!     .await
//!     .unwrap();
//! assert_eq!(result.content[0].as_text(), "hi");
//! # });
//! ```

mod context;
mod registry;
mod result;
mod traits;

pub use crate::protocol::{ToolContent, ToolDefinition};
pub use context::{ToolContext, ToolContextBuilder};
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use traits::Tool;
