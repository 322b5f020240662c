//! Scripted transport for deterministic protocol tests
//!
//! [`MockTransport`] plays back a script of byte deliveries and stalls,
//! letting tests exercise the framing engine without hardware: partial
//! packets, mid-packet silence, corrupt bytes, and plain dead air. Combined
//! with `#[tokio::test(start_paused = true)]`, stalls and silence windows
//! elapse instantly.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Result, Transport};

#[derive(Debug, Clone)]
enum Step {
    /// Deliver these bytes on the next read (split across reads if the
    /// caller's buffer is smaller).
    Deliver(Vec<u8>),
    /// Sleep before handling the next step.
    Stall(Duration),
}

/// A scripted byte-stream for testing protocol engines.
///
/// Reads consume the script in order; once it runs dry, reads pend forever,
/// which is exactly what a silent UART looks like. Everything written is
/// recorded for inspection.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: VecDeque<Step>,
    sent: Vec<u8>,
}

impl MockTransport {
    /// Create a mock with an empty script (every read pends).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for delivery in one read.
    pub fn deliver(&mut self, bytes: &[u8]) {
        self.script.push_back(Step::Deliver(bytes.to_vec()));
    }

    /// Queue bytes for delivery one read per byte.
    pub fn deliver_byte_by_byte(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.script.push_back(Step::Deliver(vec![b]));
        }
    }

    /// Queue a pause before whatever is scripted next.
    pub fn stall(&mut self, duration: Duration) {
        self.script.push_back(Step::Stall(duration));
    }

    /// Every byte written so far, in order.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// Steps not yet consumed by reads.
    pub fn remaining_steps(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.script.pop_front() {
                Some(Step::Stall(duration)) => tokio::time::sleep(duration).await,
                Some(Step::Deliver(mut bytes)) => {
                    if bytes.is_empty() {
                        continue;
                    }
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    if n < bytes.len() {
                        bytes.drain(..n);
                        self.script.push_front(Step::Deliver(bytes));
                    }
                    return Ok(n);
                }
                // Script exhausted: dead air, like a sensor that never
                // answers. The engine's silence deadline deals with it.
                None => std::future::pending::<()>().await,
            }
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.sent.extend_from_slice(data);
        Ok(())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_script_order() {
        let mut mock = MockTransport::new();
        mock.deliver(&[1, 2, 3]);
        mock.deliver(&[4]);

        let mut buf = [0u8; 8];
        assert_eq!(mock.read(&mut buf).await.unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(mock.read(&mut buf).await.unwrap(), 1);
        assert_eq!(buf[0], 4);
    }

    #[tokio::test]
    async fn splits_across_small_buffers() {
        let mut mock = MockTransport::new();
        mock.deliver(&[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 2];
        assert_eq!(mock.read(&mut buf).await.unwrap(), 2);
        assert_eq!(mock.read(&mut buf).await.unwrap(), 2);
        assert_eq!(mock.read(&mut buf).await.unwrap(), 1);
        assert_eq!(buf[0], 5);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_script_pends() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 1];

        let read = tokio::time::timeout(Duration::from_secs(1), mock.read(&mut buf));
        assert!(read.await.is_err());
    }

    #[tokio::test]
    async fn records_writes() {
        let mut mock = MockTransport::new();
        mock.write_all(&[0x55, 0xAA]).await.unwrap();
        mock.write_all(&[0x01]).await.unwrap();
        assert_eq!(mock.sent(), &[0x55, 0xAA, 0x01]);
    }
}
