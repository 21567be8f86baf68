//! Wiring between configuration, the MCP server and its transports.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use mcp_server::prelude::{McpServer, SseBinding, SseOptions, StdioTransport};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::RelayConfig;
use crate::forwarder::QueryForwarder;
use crate::tool::AppliqueComponentTool;
use crate::{SERVER_NAME, SERVER_VERSION};

/// The relay: an MCP server with the component tool registered.
pub struct RelayServer {
    server: Arc<McpServer>,
    config: RelayConfig,
}

impl RelayServer {
    /// Build from a validated configuration.
    pub fn new(config: RelayConfig) -> Result<Self> {
        let url = config.backend_url()?;
        let forwarder = QueryForwarder::new(url, config.backend.timeout())
            .context("Failed to build backend HTTP client")?;

        let server = McpServer::builder()
            .name(SERVER_NAME)
            .version(SERVER_VERSION)
            .tool(AppliqueComponentTool::new(Arc::new(forwarder)))
            .build()?;

        Ok(Self {
            server: Arc::new(server),
            config,
        })
    }

    pub fn mcp(&self) -> &McpServer {
        &self.server
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// SSE routes with a task serving every accepted session.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn sse_router(&self) -> Result<Router> {
        let options =
            SseOptions::default().allowed_origin(self.config.server.allowed_origin.clone());
        let (router, acceptor) = SseBinding::new(options)?.into_parts();
        tokio::spawn(Arc::clone(&self.server).serve_sessions(acceptor));
        Ok(router)
    }

    /// Serve SSE on the configured address until Ctrl-C.
    ///
    /// Failing to bind is an error.
    pub async fn serve_sse(&self) -> Result<()> {
        let router = self.sse_router()?;
        let addr = (self.config.server.host.as_str(), self.config.server.port);
        let listener = TcpListener::bind(addr).await.with_context(|| {
            format!(
                "Failed to bind {}:{}",
                self.config.server.host, self.config.server.port
            )
        })?;

        let local = listener.local_addr()?;
        info!(
            address = %local,
            backend = %self.config.backend.query_url,
            "SSE transport listening on http://{}/sse",
            local
        );

        tokio::select! {
            served = axum::serve(listener, router) => served.context("HTTP server failed")?,
            _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
        }
        Ok(())
    }

    /// Serve a single session over stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        info!(backend = %self.config.backend.query_url, "Serving MCP over stdio");
        self.server.serve(StdioTransport::new()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::TOOL_NAME;

    #[test]
    fn test_server_identity_and_tools() {
        let relay = RelayServer::new(RelayConfig::default()).unwrap();

        assert_eq!(relay.mcp().config().name(), "Applique Component RAG");
        assert_eq!(relay.mcp().config().version(), "1.0.0");

        let tools = relay.mcp().tools().list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, TOOL_NAME);
    }

    #[test]
    fn test_rejects_bad_backend_url() {
        let mut config = RelayConfig::default();
        config.backend.query_url = "ftp://example.com/query".to_string();
        assert!(RelayServer::new(config).is_err());
    }

    #[tokio::test]
    async fn test_bind_failure_is_an_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = RelayConfig::default();
        config.server.port = taken.local_addr().unwrap().port();

        let err = RelayServer::new(config).unwrap().serve_sse().await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to bind"));
    }
}
