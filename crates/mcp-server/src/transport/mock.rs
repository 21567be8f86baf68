//! In-memory transport for tests.
//!
//! Requests are queued up front; `recv` drains the queue and reports the end
//! of input once it is empty. Responses can still be sent until `close`.
//! Clones share state, so a test can keep one handle while the server consumes
//! another and inspect the responses after the serve loop returns.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::traits::Transport;
use crate::error::TransportError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Scripted transport that records everything sent to it.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
    session_id: Option<String>,
}

#[derive(Default)]
struct MockTransportState {
    requests: VecDeque<JsonRpcRequest>,
    responses: Vec<JsonRpcResponse>,
    closed: bool,
}

impl MockTransport {
    /// Empty transport; `recv` returns `None` until requests are pushed
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport preloaded with `requests`
    pub fn with_requests(requests: impl IntoIterator<Item = JsonRpcRequest>) -> Self {
        let transport = Self::new();
        transport.state.lock().requests.extend(requests);
        transport
    }

    /// Report `id` from [`Transport::session_id`]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Queue a request
    pub fn push_request(&self, request: JsonRpcRequest) {
        self.state.lock().requests.push_back(request);
    }

    /// Responses sent so far
    pub fn responses(&self) -> Vec<JsonRpcResponse> {
        self.state.lock().responses.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn recv(&mut self) -> Option<JsonRpcRequest> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.requests.pop_front()
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        state.responses.push(response);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.lock().closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}
