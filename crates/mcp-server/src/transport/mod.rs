//! Transports carrying JSON-RPC between a client and the server.
//!
//! - [`StdioTransport`]: newline-delimited frames over stdin/stdout (or any
//!   pair of async streams)
//! - [`SseTransport`]: one session of the SSE binding, produced by
//!   [`SessionAcceptor`] (feature `sse`)
//! - [`MockTransport`]: scripted in-memory transport for tests

mod mock;
mod stdio;
mod traits;

#[cfg(feature = "sse")]
mod sse;

pub use mock::MockTransport;
pub use stdio::StdioTransport;
pub use traits::Transport;

#[cfg(feature = "sse")]
pub use sse::{SessionAcceptor, SseBinding, SseOptions, SseTransport, MESSAGES_PATH, SSE_PATH};
