//! Server-Sent-Events binding.
//!
//! The binding exposes two routes:
//!
//! - `GET /sse` opens the event stream for a new session. The first event is
//!   `endpoint`, whose data is the URL the client must POST to
//!   (`/messages?sessionId=<uuid>`). Every JSON-RPC response for the session
//!   follows as a `message` event.
//! - `POST /messages` queues one JSON-RPC envelope on the active session and
//!   answers `200 {"status":"accepted"}`. The reply itself travels on the
//!   event stream.
//!
//! Only one session is live at a time. The slot is taken by `GET /sse` and
//! released when its event stream is dropped, either because the client went
//! away or because the server stopped serving the session. Requests that do
//! not fit the current state get a deterministic 4xx answer:
//!
//! | situation | status |
//! |---|---|
//! | POST with no live session | 409 |
//! | POST naming another session | 404 |
//! | POST body that is not a JSON-RPC request | 400 |
//! | `GET /sse` while a session is live | 409 |
//!
//! Each accepted session is handed to the server as an owned [`SseTransport`]
//! through the [`SessionAcceptor`].
//!
//! ```rust,no_run
//! use mcp_server::transport::{SseBinding, SseOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let options = SseOptions::default().allowed_origin("http://localhost:5173");
//! let (router, mut acceptor) = SseBinding::new(options)?.into_parts();
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! tokio::spawn(async move { axum::serve(listener, router).await });
//!
//! while let Some(transport) = acceptor.accept().await {
//!     // hand `transport` to McpServer::serve
//!     # drop(transport);
//! }
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Query, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::traits::Transport;
use crate::error::{McpError, TransportError};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Path of the event stream route
pub const SSE_PATH: &str = "/sse";

/// Path of the message inbox route
pub const MESSAGES_PATH: &str = "/messages";

/// Settings for [`SseBinding`].
#[derive(Debug, Clone)]
pub struct SseOptions {
    allowed_origin: Option<String>,
    keep_alive: Duration,
}

impl Default for SseOptions {
    fn default() -> Self {
        Self {
            allowed_origin: None,
            keep_alive: Duration::from_secs(15),
        }
    }
}

impl SseOptions {
    /// The one browser origin allowed to call the binding.
    ///
    /// Requests carrying any other `Origin` header are refused with 403.
    /// Without this setting no CORS headers are emitted and every request
    /// carrying an `Origin` header is refused.
    pub fn allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = Some(origin.into());
        self
    }

    /// Interval between keep-alive comments on the event stream
    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }
}

/// HTTP router plus the receiving end of accepted sessions.
pub struct SseBinding {
    router: Router,
    acceptor: SessionAcceptor,
}

impl SseBinding {
    /// Build the routes.
    ///
    /// # Errors
    ///
    /// [`McpError::Config`] when the allowed origin is not a valid header value.
    pub fn new(options: SseOptions) -> Result<Self, McpError> {
        let allowed_origin = options
            .allowed_origin
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()
            .map_err(|e| McpError::Config(format!("invalid allowed origin: {e}")))?;

        let (sessions_tx, sessions_rx) = mpsc::unbounded_channel();
        let state = SseState {
            slot: Arc::new(Mutex::new(None)),
            sessions: sessions_tx,
            keep_alive: options.keep_alive,
        };

        let mut router = Router::new()
            .route(SSE_PATH, get(open_session))
            .route(MESSAGES_PATH, post(post_message))
            .with_state(state);

        if let Some(origin) = &allowed_origin {
            let cors = CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin.clone()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
            router = router.layer(cors);
        }

        let router = router
            .layer(middleware::from_fn_with_state(allowed_origin, origin_guard))
            .layer(TraceLayer::new_for_http());

        Ok(Self {
            router,
            acceptor: SessionAcceptor { rx: sessions_rx },
        })
    }

    /// Split into the router and the session acceptor
    pub fn into_parts(self) -> (Router, SessionAcceptor) {
        (self.router, self.acceptor)
    }
}

/// Yields one [`SseTransport`] per accepted `GET /sse`.
///
/// Dropping the acceptor makes later `GET /sse` requests fail with 503.
pub struct SessionAcceptor {
    rx: mpsc::UnboundedReceiver<SseTransport>,
}

impl SessionAcceptor {
    /// Wait for the next session; `None` once the router is gone
    pub async fn accept(&mut self) -> Option<SseTransport> {
        self.rx.recv().await
    }
}

/// One SSE session as seen by the server's dispatch loop.
pub struct SseTransport {
    id: String,
    inbox: mpsc::UnboundedReceiver<JsonRpcRequest>,
    outbox: Option<mpsc::UnboundedSender<JsonRpcResponse>>,
}

#[async_trait]
impl Transport for SseTransport {
    async fn recv(&mut self) -> Option<JsonRpcRequest> {
        if self.outbox.is_none() {
            return None;
        }
        let request = self.inbox.recv().await;
        if request.is_none() {
            self.outbox = None;
        }
        request
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError> {
        let outbox = self.outbox.as_ref().ok_or(TransportError::Closed)?;
        outbox.send(response).map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.outbox = None;
        self.inbox.close();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.outbox.as_ref().is_none_or(|tx| tx.is_closed())
    }

    fn session_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

#[derive(Clone)]
struct SseState {
    slot: Arc<Mutex<Option<ActiveSession>>>,
    sessions: mpsc::UnboundedSender<SseTransport>,
    keep_alive: Duration,
}

struct ActiveSession {
    id: String,
    inbox: mpsc::UnboundedSender<JsonRpcRequest>,
}

/// Frees the session slot when the event stream is dropped.
struct SessionGuard {
    slot: Arc<Mutex<Option<ActiveSession>>>,
    id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|active| active.id == self.id) {
            *slot = None;
            tracing::info!(session_id = %self.id, "SSE session closed");
        }
    }
}

/// Precondition failures on the two routes.
#[derive(Debug, thiserror::Error)]
enum SessionError {
    #[error("no active SSE session; open /sse first")]
    NoSession,

    #[error("unknown session '{0}'")]
    UnknownSession(String),

    #[error("an SSE session is already active")]
    AlreadyActive,

    #[error("server is not accepting sessions")]
    Unavailable,

    #[error("{0}")]
    Malformed(JsonRpcError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            SessionError::NoSession | SessionError::AlreadyActive => {
                (StatusCode::CONFLICT, JsonRpcError::connection_error(self.to_string()))
            }
            SessionError::UnknownSession(_) => {
                (StatusCode::NOT_FOUND, JsonRpcError::connection_error(self.to_string()))
            }
            SessionError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                JsonRpcError::connection_error(self.to_string()),
            ),
            SessionError::Malformed(error) => (StatusCode::BAD_REQUEST, error),
        };
        (status, Json(JsonRpcResponse::error(None, error))).into_response()
    }
}

async fn open_session(
    State(state): State<SseState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, SessionError> {
    let id = Uuid::new_v4().to_string();
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

    {
        let mut slot = state.slot.lock();
        if let Some(active) = slot.as_ref() {
            tracing::warn!(active = %active.id, "Refused second SSE connection");
            return Err(SessionError::AlreadyActive);
        }
        *slot = Some(ActiveSession {
            id: id.clone(),
            inbox: inbox_tx,
        });
    }

    let guard = SessionGuard {
        slot: state.slot.clone(),
        id: id.clone(),
    };

    let transport = SseTransport {
        id: id.clone(),
        inbox: inbox_rx,
        outbox: Some(outbox_tx),
    };
    if state.sessions.send(transport).is_err() {
        return Err(SessionError::Unavailable);
    }

    tracing::info!(session_id = %id, "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{MESSAGES_PATH}?sessionId={id}"));

    let messages = UnboundedReceiverStream::new(outbox_rx).filter_map(|response| {
        match Event::default().event("message").json_data(&response) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode SSE message");
                None
            }
        }
    });

    let stream = tokio_stream::once(endpoint)
        .chain(messages)
        .map(move |event| {
            let _session = &guard;
            Ok::<_, Infallible>(event)
        });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(state.keep_alive)))
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, SessionError> {
    let inbox = {
        let slot = state.slot.lock();
        let active = slot.as_ref().ok_or(SessionError::NoSession)?;
        if let Some(requested) = query.session_id
            && requested != active.id
        {
            return Err(SessionError::UnknownSession(requested));
        }
        active.inbox.clone()
    };

    let text = std::str::from_utf8(&body)
        .map_err(|e| SessionError::Malformed(JsonRpcError::parse_error(Some(e.to_string()))))?;
    let request = JsonRpcRequest::parse(text).map_err(SessionError::Malformed)?;

    tracing::debug!(method = %request.method, "Queued message for SSE session");
    inbox.send(request).map_err(|_| SessionError::NoSession)?;

    Ok((StatusCode::OK, Json(json!({"status": "accepted"}))))
}

async fn origin_guard(
    State(allowed): State<Option<HeaderValue>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN)
        && allowed.as_ref() != Some(origin)
    {
        tracing::warn!(origin = ?origin, "Rejected request from disallowed origin");
        let error = JsonRpcError::new(
            crate::protocol::mcp_codes::SERVER_ERROR,
            "Origin not allowed".to_string(),
            None,
        );
        return (StatusCode::FORBIDDEN, Json(JsonRpcResponse::error(None, error))).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{codes, mcp_codes};
    use axum::body::Body;
    use serde_json::Value;
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:5173";

    fn binding() -> (Router, SessionAcceptor) {
        SseBinding::new(
            SseOptions::default()
                .allowed_origin(ORIGIN)
                .keep_alive(Duration::from_secs(600)),
        )
        .unwrap()
        .into_parts()
    }

    fn get_sse() -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(SSE_PATH)
            .body(Body::empty())
            .unwrap()
    }

    fn post(uri: &str, body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Next non-comment SSE frame as (event, data).
    async fn next_event<S>(stream: &mut S, buffer: &mut String) -> (String, String)
    where
        S: futures::Stream<Item = Result<Bytes, axum::Error>> + Unpin,
    {
        loop {
            if let Some(end) = buffer.find("\n\n") {
                let frame: String = buffer.drain(..end + 2).collect();
                let mut event = String::new();
                let mut data = String::new();
                for line in frame.lines() {
                    if let Some(value) = line.strip_prefix("event: ") {
                        event = value.to_string();
                    } else if let Some(value) = line.strip_prefix("data: ") {
                        data = value.to_string();
                    }
                }
                if event.is_empty() && data.is_empty() {
                    continue;
                }
                return (event, data);
            }
            let chunk = stream.next().await.unwrap().unwrap();
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }

    #[tokio::test]
    async fn test_post_without_session_is_conflict() {
        let (router, _acceptor) = binding();
        let response = router
            .oneshot(post(MESSAGES_PATH, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], mcp_codes::CONNECTION_ERROR);
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let (router, mut acceptor) = binding();

        let response = router.clone().oneshot(get_sse()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );

        let mut events = response.into_body().into_data_stream();
        let mut buffer = String::new();
        let (event, endpoint) = next_event(&mut events, &mut buffer).await;
        assert_eq!(event, "endpoint");
        assert!(endpoint.starts_with("/messages?sessionId="));

        let mut transport = acceptor.accept().await.unwrap();
        assert_eq!(
            Some(endpoint.trim_start_matches("/messages?sessionId=")),
            transport.session_id()
        );

        let ack = router
            .clone()
            .oneshot(post(&endpoint, r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#))
            .await
            .unwrap();
        assert_eq!(ack.status(), StatusCode::OK);
        assert_eq!(json_body(ack).await, json!({"status": "accepted"}));

        let request = transport.recv().await.unwrap();
        assert_eq!(request.method, "ping");
        transport
            .send(JsonRpcResponse::success(request.id, json!({})))
            .await
            .unwrap();

        let (event, data) = next_event(&mut events, &mut buffer).await;
        assert_eq!(event, "message");
        let message: Value = serde_json::from_str(&data).unwrap();
        assert_eq!(message, json!({"jsonrpc": "2.0", "id": 7, "result": {}}));
    }

    #[tokio::test]
    async fn test_second_stream_is_refused_until_first_closes() {
        let (router, mut acceptor) = binding();

        let first = router.clone().oneshot(get_sse()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let mut transport = acceptor.accept().await.unwrap();

        let second = router.clone().oneshot(get_sse()).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        drop(first);
        assert!(transport.recv().await.is_none());
        assert!(transport.is_closed());

        let third = router.clone().oneshot(get_sse()).await.unwrap();
        assert_eq!(third.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (router, _acceptor) = binding();
        let _stream = router.clone().oneshot(get_sse()).await.unwrap();

        let response = router
            .oneshot(post(
                "/messages?sessionId=not-the-session",
                r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (router, _acceptor) = binding();
        let _stream = router.clone().oneshot(get_sse()).await.unwrap();

        let response = router.oneshot(post(MESSAGES_PATH, "{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], codes::PARSE_ERROR);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_origin_policy() {
        let (router, _acceptor) = binding();

        let foreign = axum::http::Request::builder()
            .method(Method::POST)
            .uri(MESSAGES_PATH)
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::from("{}"))
            .unwrap();
        let response = router.clone().oneshot(foreign).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let allowed = axum::http::Request::builder()
            .method(Method::POST)
            .uri(MESSAGES_PATH)
            .header(header::ORIGIN, ORIGIN)
            .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .unwrap();
        let response = router.oneshot(allowed).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
    }

    #[tokio::test]
    async fn test_dropped_acceptor_makes_streams_unavailable() {
        let (router, acceptor) = binding();
        drop(acceptor);

        let response = router.clone().oneshot(get_sse()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        // the refused stream must not hold the slot
        let response = router
            .oneshot(post(MESSAGES_PATH, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_origin_is_config_error() {
        let result = SseBinding::new(SseOptions::default().allowed_origin("bad\norigin"));
        assert!(matches!(result, Err(McpError::Config(_))));
    }
}
