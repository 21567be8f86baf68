//! Fluent construction of [`McpServer`].

use std::sync::Arc;

use super::{McpServer, ServerConfig};
use crate::error::McpError;
use crate::tool::{Tool, ToolRegistry};
use crate::SUPPORTED_PROTOCOL_VERSIONS;

/// Builder for [`McpServer`].
///
/// ```
/// use mcp_server::McpServer;
///
/// let server = McpServer::builder()
///     .name("Applique Component RAG")
///     .version("1.0.0")
///     .build()
///     .unwrap();
/// assert_eq!(server.config().name(), "Applique Component RAG");
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    name: Option<String>,
    version: Option<String>,
    protocol_version: Option<String>,
    instructions: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("protocol_version", &self.protocol_version)
            .field("tools", &format!("<{} tools>", self.tools.len()))
            .finish()
    }
}

impl ServerBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Server name (required)
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Server version (required)
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Fallback protocol version; must be one of [`SUPPORTED_PROTOCOL_VERSIONS`]
    pub fn protocol_version(mut self, protocol_version: impl Into<String>) -> Self {
        self.protocol_version = Some(protocol_version.into());
        self
    }

    /// Instructions returned from `initialize`
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Add a tool
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Add shared tools
    pub fn tools<I>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        self.tools.extend(tools);
        self
    }

    /// Register the tools and produce the server.
    ///
    /// # Errors
    ///
    /// [`McpError::Config`] when name or version is missing or the protocol
    /// version is unsupported; [`McpError::Tool`] when a tool cannot be
    /// registered (duplicate name, schema that does not compile).
    pub fn build(self) -> Result<McpServer, McpError> {
        let name = self
            .name
            .ok_or_else(|| McpError::Config("server name is required".to_string()))?;
        let version = self
            .version
            .ok_or_else(|| McpError::Config("server version is required".to_string()))?;

        let mut config = ServerConfig::new(name, version);
        if let Some(protocol_version) = self.protocol_version {
            if !SUPPORTED_PROTOCOL_VERSIONS.contains(&protocol_version.as_str()) {
                return Err(McpError::Config(format!(
                    "unsupported protocol version '{protocol_version}'"
                )));
            }
            config.protocol_version = protocol_version;
        }
        config.instructions = self.instructions;

        let registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register_arc(tool)?;
        }

        Ok(McpServer::new(config, registry))
    }
}
