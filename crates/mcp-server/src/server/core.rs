//! MCP request dispatch.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{ServerBuilder, ServerConfig};
use crate::error::McpError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolsCapability,
};
use crate::tool::{ToolContext, ToolRegistry};
use crate::transport::Transport;
use crate::SUPPORTED_PROTOCOL_VERSIONS;

/// An MCP server: identity, tools, and the dispatch loop.
///
/// One server value can serve any number of sessions, sequentially or
/// concurrently; it holds no per-session state.
#[derive(Debug)]
pub struct McpServer {
    config: ServerConfig,
    tools: ToolRegistry,
}

impl McpServer {
    /// Server over an already populated registry
    pub fn new(config: ServerConfig, tools: ToolRegistry) -> Self {
        Self { config, tools }
    }

    /// Start building a server
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Server identity
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registered tools
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle one inbound message.
    ///
    /// Returns `None` for notifications, which are never answered.
    pub async fn handle_message(
        &self,
        request: JsonRpcRequest,
        session_id: Option<&str>,
    ) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }
        Some(self.handle_request(request, session_id).await)
    }

    /// Answer one request.
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        session_id: Option<&str>,
    ) -> JsonRpcResponse {
        debug!(method = %request.method, id = ?request.id, "Dispatching request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request, session_id).await,
            other => {
                warn!(method = %other, "Unknown method");
                JsonRpcResponse::method_not_found(request.id)
            }
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: InitializeParams = match parse_params(request.params) {
            Ok(params) => params,
            Err(details) => {
                return JsonRpcResponse::invalid_params(
                    request.id,
                    &format!("Invalid initialize params: {details}"),
                );
            }
        };

        let protocol_version =
            if SUPPORTED_PROTOCOL_VERSIONS.contains(&params.protocol_version.as_str()) {
                params.protocol_version
            } else {
                self.config.protocol_version.clone()
            };

        info!(
            client = ?params.client_info.as_ref().map(|c| &c.name),
            protocol_version = %protocol_version,
            "Client initialized"
        );

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
            instructions: self.config.instructions.clone(),
        };
        respond(request.id, &result)
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: self.tools.list(),
        };
        respond(request.id, &result)
    }

    async fn handle_tools_call(
        &self,
        request: JsonRpcRequest,
        session_id: Option<&str>,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match parse_params(request.params) {
            Ok(params) => params,
            Err(details) => {
                return JsonRpcResponse::invalid_params(
                    request.id,
                    &format!("Invalid tool call params: {details}"),
                );
            }
        };

        let mut context = ToolContext::builder();
        if let Some(id) = &request.id {
            context = context.request_id(id.clone());
        }
        if let Some(session_id) = session_id {
            context = context.session_id(session_id);
        }
        let context = context.build();

        info!(tool = %params.name, "Calling tool");
        let arguments = params.arguments.unwrap_or(Value::Null);
        match self.tools.call(&params.name, arguments, &context).await {
            Ok(result) => respond(request.id, &CallToolResult::from(result)),
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool call failed");
                JsonRpcResponse::error(request.id, JsonRpcError::from(e))
            }
        }
    }

    /// Serve one session until the transport ends.
    ///
    /// Requests are dispatched concurrently and each response is sent as soon
    /// as it is ready, so a slow tool call holds up only its own reply.
    /// Responses that are ready are sent before the next request is read. Once
    /// the input ends, calls still in flight are answered before the session
    /// closes, unless the transport has already been closed. A failed send
    /// ends the session.
    pub async fn serve<T: Transport>(&self, mut transport: T) -> Result<(), McpError> {
        let session_id = transport.session_id().map(str::to_string);
        let session = session_id.as_deref();
        info!(session_id = ?session, "MCP session started");

        let mut in_flight = FuturesUnordered::new();
        let mut reading = true;

        loop {
            tokio::select! {
                biased;

                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    let Some(response) = outcome else {
                        continue;
                    };
                    if let Err(e) = transport.send(response).await {
                        warn!(session_id = ?session, error = %e, "Failed to send response");
                        break;
                    }
                }
                received = transport.recv(), if reading => match received {
                    Some(request) => in_flight.push(self.handle_message(request, session)),
                    None if transport.is_closed() => break,
                    None => {
                        debug!(pending = in_flight.len(), "Session input ended");
                        reading = false;
                    }
                },
                else => break,
            }
        }

        if !in_flight.is_empty() {
            warn!(
                session_id = ?session,
                dropped = in_flight.len(),
                "Abandoning unanswered requests"
            );
        }
        info!(session_id = ?session, "MCP session ended");
        transport.close().await?;
        Ok(())
    }

    /// Serve every session the SSE binding accepts, each on its own task.
    ///
    /// Returns once the acceptor is exhausted, i.e. the router has been dropped.
    #[cfg(feature = "sse")]
    pub async fn serve_sessions(
        self: std::sync::Arc<Self>,
        mut acceptor: crate::transport::SessionAcceptor,
    ) {
        while let Some(transport) = acceptor.accept().await {
            let server = std::sync::Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = server.serve(transport).await {
                    warn!(error = %e, "SSE session ended with error");
                }
            });
        }
        debug!("Session acceptor closed");
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    let params = params.ok_or_else(|| "params are required".to_string())?;
    serde_json::from_value(params).map_err(|e| e.to_string())
}

fn respond<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            JsonRpcResponse::internal_error(id, Some(format!("Failed to serialize result: {e}")))
        }
    }
}
