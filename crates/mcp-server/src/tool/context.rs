//! Per-call context handed to tools.

use serde_json::Value;

/// Information about the call a tool is serving.
///
/// ```
/// use mcp_server::tool::ToolContext;
/// use serde_json::json;
///
/// let context = ToolContext::builder()
///     .session_id("0b6f3c1e")
///     .request_id(json!(4))
///     .build();
///
/// assert_eq!(context.session_id(), Some("0b6f3c1e"));
/// assert_eq!(context.request_id(), Some(&json!(4)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    session_id: Option<String>,
    request_id: Option<Value>,
}

impl ToolContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a context
    pub fn builder() -> ToolContextBuilder {
        ToolContextBuilder::default()
    }

    /// Transport session the call arrived on, if the transport has one
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// JSON-RPC id of the `tools/call` request
    pub fn request_id(&self) -> Option<&Value> {
        self.request_id.as_ref()
    }
}

/// Builder for [`ToolContext`]
#[derive(Debug, Default)]
pub struct ToolContextBuilder {
    session_id: Option<String>,
    request_id: Option<Value>,
}

impl ToolContextBuilder {
    /// Set the session id
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Set the request id
    pub fn request_id(mut self, id: Value) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Finish
    pub fn build(self) -> ToolContext {
        ToolContext {
            session_id: self.session_id,
            request_id: self.request_id,
        }
    }
}
