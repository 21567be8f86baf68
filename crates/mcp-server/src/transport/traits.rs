//! The `Transport` trait.
//!
//! A transport moves JSON-RPC envelopes between one client and the server's
//! dispatch loop. Framing, parse failures on the wire and connection lifetime
//! are the transport's business; the dispatch loop only ever sees requests that
//! parsed.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// One client connection as seen by the server.
///
/// ```rust
/// use mcp_server::protocol::{JsonRpcRequest, JsonRpcResponse};
/// use mcp_server::transport::{MockTransport, Transport};
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut transport = MockTransport::new();
/// transport.push_request(JsonRpcRequest::new(Some(json!(1)), "ping".to_string(), None));
///
/// while let Some(request) = transport.recv().await {
///     let response = JsonRpcResponse::success(request.id, json!({}));
///     transport.send(response).await.unwrap();
/// }
///
/// transport.close().await.unwrap();
/// assert!(transport.is_closed());
/// # });
/// ```
#[async_trait]
pub trait Transport: Send {
    /// Next request from the client, or `None` once no more will arrive.
    ///
    /// The dispatch loop races this against in-flight requests, so it must be
    /// cancel safe: dropping the future before it completes loses no input.
    /// Input ending does not by itself close the transport; responses to
    /// requests already received can still be sent.
    async fn recv(&mut self) -> Option<JsonRpcRequest>;

    /// Deliver a response to the client
    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError>;

    /// Close the connection; later `recv` calls return `None` and `send` fails
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Whether the connection is closed and responses can no longer be sent
    fn is_closed(&self) -> bool;

    /// Identifier of the session this transport carries, if it has one
    fn session_id(&self) -> Option<&str> {
        None
    }
}
