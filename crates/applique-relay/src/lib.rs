//! Applique component relay
//!
//! An MCP server exposing one tool, `getAppliqueComponentDetails`, which
//! forwards a free-text query to the component knowledge base over HTTP and
//! hands the answer back as text.
//!
//! The server runs over one of two transports:
//!
//! - **SSE**: `GET /sse` opens the event stream, `POST /messages?sessionId=…`
//!   delivers requests. One client at a time.
//! - **stdio**: newline-delimited JSON-RPC on stdin/stdout.
//!
//! # Example
//!
//! ```no_run
//! use applique_relay::{config::RelayConfig, RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RelayConfig::load(None)?;
//!     RelayServer::new(config)?.serve_stdio().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod forwarder;
pub mod server;
pub mod tool;

pub use server::RelayServer;

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "Applique Component RAG";

/// Version reported in `serverInfo`
pub const SERVER_VERSION: &str = "1.0.0";
