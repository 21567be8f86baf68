//! Newline-delimited JSON-RPC over a pair of byte streams.
//!
//! Each inbound line is one request; each outbound response is written as one
//! line and flushed. EOF on the input ends the stream of requests; responses
//! can still be written until the transport is closed. A line that is not
//! UTF-8 or does not parse is answered with a JSON-RPC parse error (id `null`)
//! and reading continues with the next line.
//!
//! Nothing but protocol frames is ever written to the output stream, so
//! process logs must go elsewhere (stderr).
//!
//! ```rust,no_run
//! use mcp_server::transport::{StdioTransport, Transport};
//!
//! # async fn run() {
//! let mut transport = StdioTransport::new();
//! while let Some(request) = transport.recv().await {
//!     eprintln!("received {}", request.method);
//! }
//! # }
//! ```

use async_trait::async_trait;
use tokio::io::{
    stdin, stdout, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use super::traits::Transport;
use crate::error::TransportError;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Line-framed transport over a reader and a writer.
pub struct StdioTransport<R = Stdin, W = Stdout> {
    reader: BufReader<R>,
    writer: W,
    // partial line kept across cancelled reads
    line: Vec<u8>,
    eof: bool,
    closed: bool,
}

impl StdioTransport {
    /// Transport over the process's stdin and stdout
    pub fn new() -> Self {
        Self::from_streams(stdin(), stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Transport over arbitrary streams, e.g. one half of a `tokio::io::duplex`
    pub fn from_streams(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            line: Vec::new(),
            eof: false,
            closed: false,
        }
    }

    async fn write_frame(&mut self, response: &JsonRpcResponse) -> Result<(), TransportError> {
        let mut frame = serde_json::to_vec(response)
            .map_err(|e| TransportError::InvalidMessage(e.to_string()))?;
        frame.push(b'\n');
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<R, W> Transport for StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Option<JsonRpcRequest> {
        while !(self.closed || self.eof) {
            match self.reader.read_until(b'\n', &mut self.line).await {
                Ok(0) => {
                    tracing::debug!("stdin reached EOF");
                    self.eof = true;
                    if self.line.is_empty() {
                        continue;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "I/O error reading stdin");
                    self.closed = true;
                    continue;
                }
            }

            let line = std::mem::take(&mut self.line);
            match parse_frame(&line) {
                None => continue,
                Some(Ok(request)) => return Some(request),
                Some(Err(error)) => {
                    tracing::warn!(%error, "Rejected malformed stdio frame");
                    let reply = JsonRpcResponse::error(None, error);
                    if let Err(e) = self.write_frame(&reply).await {
                        tracing::error!(error = %e, "Failed to answer malformed frame");
                        self.closed = true;
                    }
                }
            }
        }
        None
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.write_frame(&response).await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.writer.flush().await?;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// `None` for a blank line.
fn parse_frame(line: &[u8]) -> Option<Result<JsonRpcRequest, JsonRpcError>> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(e) => {
            return Some(Err(JsonRpcError::parse_error(Some(format!("invalid UTF-8: {e}")))));
        }
    };
    if text.is_empty() {
        return None;
    }
    Some(JsonRpcRequest::parse(text))
}
