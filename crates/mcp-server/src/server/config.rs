//! Server identity and protocol settings.

use crate::PROTOCOL_VERSION;

/// What the server announces in its `initialize` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) protocol_version: String,
    pub(crate) instructions: Option<String>,
}

impl ServerConfig {
    /// Config with the default protocol version and no instructions
    ///
    /// ```
    /// use mcp_server::ServerConfig;
    ///
    /// let config = ServerConfig::new("Applique Component RAG", "1.0.0");
    /// assert_eq!(config.protocol_version(), "2025-03-26");
    /// ```
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            instructions: None,
        }
    }

    /// Server name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Server version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Protocol version used when the client asks for one we do not speak
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Usage hints sent to clients, if any
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_new() {
        let config = ServerConfig::new("test-server", "1.0.0");
        assert_eq!(config.name(), "test-server");
        assert_eq!(config.version(), "1.0.0");
        assert_eq!(config.protocol_version(), PROTOCOL_VERSION);
        assert!(config.instructions().is_none());
    }
}
