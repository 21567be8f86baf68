//! MCP message payloads carried inside JSON-RPC envelopes.
//!
//! Only the tool-serving subset of the protocol is modelled: the initialize
//! handshake, `tools/list` and `tools/call`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ================================================================================================
// Initialization
// ================================================================================================

/// Parameters of the `initialize` request.
///
/// Client capabilities are kept as raw JSON; this server does not act on them.
///
/// ```
/// use mcp_server::protocol::InitializeParams;
///
/// let params: InitializeParams = serde_json::from_value(serde_json::json!({
///     "protocolVersion": "2024-11-05",
///     "capabilities": {},
///     "clientInfo": {"name": "inspector", "version": "0.9.0"}
/// }))
/// .unwrap();
/// assert_eq!(params.protocol_version, "2024-11-05");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeParams {
    /// Protocol version the client asks for
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,

    /// Client capabilities
    #[serde(default)]
    pub capabilities: Value,

    /// Client information
    #[serde(rename = "clientInfo", default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeResult {
    /// Protocol version the server will speak on this session
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,

    /// Server capabilities
    pub capabilities: ServerCapabilities,

    /// Server information
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,

    /// Free-form usage hints for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Information about the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    /// Server name
    pub name: String,

    /// Server version
    pub version: String,
}

/// Information about the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientInfo {
    /// Client name
    pub name: String,

    /// Client version
    pub version: String,
}

/// Capabilities advertised by the server during initialization.
///
/// ```
/// use mcp_server::protocol::{ServerCapabilities, ToolsCapability};
///
/// let capabilities = ServerCapabilities {
///     tools: Some(ToolsCapability { list_changed: Some(false) }),
/// };
/// let json = serde_json::to_value(&capabilities).unwrap();
/// assert_eq!(json["tools"]["listChanged"], false);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServerCapabilities {
    /// Tool execution capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolsCapability {
    /// Whether the server emits `notifications/tools/list_changed`
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

// ================================================================================================
// Tools
// ================================================================================================

/// Tool definition exposed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for input validation
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result of `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListToolsResult {
    /// Available tools
    pub tools: Vec<ToolDefinition>,
}

/// Parameters for calling a tool
///
/// ```
/// use mcp_server::protocol::CallToolParams;
/// use serde_json::json;
///
/// let params: CallToolParams = serde_json::from_value(json!({
///     "name": "getAppliqueComponentDetails",
///     "arguments": {"query": "red applique patch"}
/// })).unwrap();
/// assert_eq!(params.arguments.unwrap()["query"], "red applique patch");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolParams {
    /// Tool name to call
    pub name: String,

    /// Tool arguments (must match inputSchema)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Result of a tool call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolResult {
    /// Result content blocks
    pub content: Vec<ToolContent>,

    /// Whether this result represents an error
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content block returned by a tool
///
/// ```
/// use mcp_server::protocol::ToolContent;
/// use serde_json::json;
///
/// let block = ToolContent::text("Hello");
/// assert_eq!(serde_json::to_value(&block).unwrap(), json!({"type": "text", "text": "Hello"}));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content
    Text {
        /// The text content
        text: String,
    },
}

impl ToolContent {
    /// Build a text block
    pub fn text(text: impl Into<String>) -> Self {
        ToolContent::Text { text: text.into() }
    }

    /// Text of the block
    pub fn as_text(&self) -> &str {
        match self {
            ToolContent::Text { text } => text,
        }
    }
}
