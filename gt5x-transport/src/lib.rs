//! Transport layer for the GT5X protocol
//!
//! Provides the byte-stream boundary the protocol engine reads and writes
//! through: a UART ([`SerialTransport`]), a serial-over-TCP bridge
//! ([`TcpTransport`]), and a scripted [`MockTransport`] for tests.

pub mod error;
pub mod mock;
pub mod serial;
pub mod sink;
pub mod tcp;

pub use error::{Error, Result};
pub use mock::MockTransport;
pub use serial::SerialTransport;
pub use sink::{Sink, WriterSink};
pub use tcp::TcpTransport;

use async_trait::async_trait;

/// Byte-stream transport the protocol engine runs over.
///
/// The engine assumes the stream is reliable at the byte level: bytes that
/// arrive are intact and in order, but frames may be truncated, delayed, or
/// never arrive at all. Timeouts are the engine's job, not the transport's.
#[async_trait]
pub trait Transport: Send {
    /// Read whatever bytes are currently available, up to `buf.len()`.
    ///
    /// Waits until at least one byte arrives; never returns `Ok(0)`. A
    /// stream that can close (TCP) reports end-of-stream as
    /// [`Error::ConnectionClosed`].
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write every byte of `data`, preserving order.
    async fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Human-readable endpoint description for logging.
    fn describe(&self) -> String;
}
