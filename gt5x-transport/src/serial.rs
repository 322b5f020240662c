//! Serial port transport
//!
//! GT5X modules talk 8N1 UART, 9600 baud out of the box, reconfigurable up to
//! 115200 with the change-baud-rate command. After changing the device-side
//! rate, call [`SerialTransport::set_baud_rate`] to move the port along.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, trace};

use crate::{Result, Transport};

/// Factory-default baud rate of the sensor.
pub const DEFAULT_BAUD: u32 = 9600;

/// Serial port transport for a directly attached sensor.
pub struct SerialTransport {
    path: String,
    stream: SerialStream,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate, 8N1.
    pub fn open(path: impl Into<String>, baud_rate: u32) -> Result<Self> {
        let path = path.into();

        debug!(port = %path, baud_rate, "opening serial port");

        let stream = tokio_serial::new(&path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()?;

        Ok(Self { path, stream })
    }

    /// Reconfigure the port's baud rate in place.
    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        debug!(port = %self.path, baud_rate, "changing port baud rate");
        self.stream.set_baud_rate(baud_rate)?;
        Ok(())
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.stream.read(buf).await?;
        if n == 0 {
            // A USB adapter that went away reads as end-of-stream.
            return Err(crate::Error::ConnectionClosed);
        }
        trace!(port = %self.path, "read {} bytes", n);
        Ok(n)
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        trace!(port = %self.path, "writing {} bytes", data.len());
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}
