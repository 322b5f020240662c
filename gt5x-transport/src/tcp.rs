//! TCP transport
//!
//! For sensors hanging off a serial-over-TCP bridge (ser2net, ESP-Link and
//! friends). The bridge is expected to be transparent: raw sensor bytes in
//! both directions, no framing of its own.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{Error, Result, Transport};

/// TCP transport for a bridged sensor.
pub struct TcpTransport {
    addr: SocketAddr,
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to a bridge, giving up after `connect_timeout`.
    pub async fn connect(
        addr: impl Into<String>,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let addr_str = format!("{}:{}", addr.into(), port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{addr_str}: {e}")))?
            .collect();

        let addr = *addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {addr_str}")))?;

        debug!("Connecting to {}...", addr);

        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connect timed out",
                ))
            })?
            .map_err(Error::Io)?;

        // Command/reply exchanges are latency-bound
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        Ok(Self { addr, stream })
    }

    /// Shut the connection down gracefully.
    pub async fn close(mut self) -> Result<()> {
        debug!("Disconnecting from {}...", self.addr);
        let _ = self.stream.shutdown().await;
        Ok(())
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.stream.read(buf).await?;
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }
        trace!(addr = %self.addr, "read {} bytes", n);
        Ok(n)
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        trace!(addr = %self.addr, "writing {} bytes", data.len());
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_address_rejected() {
        let result = TcpTransport::connect(
            "invalid..address",
            4370,
            Duration::from_millis(100),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn roundtrip_through_local_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4];
            sock.read_exact(&mut buf).await.unwrap();
            sock.write_all(&buf).await.unwrap();
        });

        let mut transport = TcpTransport::connect(
            addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        transport.write_all(&[1, 2, 3, 4]).await.unwrap();

        let mut buf = [0u8; 8];
        let n = transport.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &[1, 2, 3, 4][..n]);

        server.await.unwrap();
    }
}
