//! Streaming data sink
//!
//! Streaming data reads relay payload bytes onward instead of buffering them.
//! The protocol engine treats the relay as fire-and-forget: a sink failure is
//! swallowed, not surfaced, so a sink that cares must track its own errors.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Receives payload chunks from a streaming data read, in arrival order.
#[async_trait]
pub trait Sink: Send {
    /// Accept the next chunk of payload bytes.
    async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()>;
}

#[async_trait]
impl Sink for Vec<u8> {
    async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.extend_from_slice(chunk);
        Ok(())
    }
}

/// Adapter forwarding chunks into any async writer (a file, a socket, ...).
pub struct WriterSink<W>(pub W);

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Sink for WriterSink<W> {
    async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.0.write_all(chunk).await
    }
}
