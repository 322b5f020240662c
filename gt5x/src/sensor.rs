//! High-level sensor interface
//!
//! [`Sensor`] owns the transport, the silence-timeout configuration and the
//! staging buffer, and drives the framing engine from `gt5x-core` over the
//! byte stream. Every operation runs one command/reply (or data) exchange to
//! completion before returning; the `&mut self` receivers make the
//! one-exchange-at-a-time discipline a compile-time invariant rather than a
//! convention.

use std::time::Duration;

use tracing::{debug, trace, warn};

use gt5x_core::constants::{DEFAULT_TIMEOUT, STAGING_LEN};
use gt5x_core::{CommandPacket, FrameDecoder, Opcode, Progress, Reply, packet};
use gt5x_transport::{Sink, Transport};
use gt5x_types::DeviceInfo;

use crate::error::{Error, Result};

/// The three enrollment scans, taken in order on one finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollStage {
    First,
    Second,
    Third,
}

impl EnrollStage {
    fn opcode(self) -> Opcode {
        match self {
            Self::First => Opcode::Enroll1,
            Self::Second => Opcode::Enroll2,
            Self::Third => Opcode::Enroll3,
        }
    }
}

/// Where a bulk data read puts its payload.
enum DataOut<'a> {
    Buffer(&'a mut [u8]),
    Stream(&'a mut (dyn Sink + 'a)),
}

/// A GT5X fingerprint sensor on the other end of a byte stream.
///
/// # Examples
///
/// ```no_run
/// use gt5x::Sensor;
/// use gt5x_transport::SerialTransport;
///
/// # async fn example() -> gt5x::Result<()> {
/// let port = SerialTransport::open("/dev/ttyUSB0", 9600)?;
/// let mut sensor = Sensor::new(port);
/// let info = sensor.open().await?;
/// println!("serial {}", info.serial_hex());
/// # Ok(())
/// # }
/// ```
pub struct Sensor<T: Transport> {
    transport: T,
    timeout: Duration,
    /// Staging buffer all reads land in; also bounds the chunks a streaming
    /// data read relays to its sink.
    scratch: [u8; STAGING_LEN],
    info: Option<DeviceInfo>,
}

impl<T: Transport> Sensor<T> {
    /// Wrap a transport with the default 1 s silence timeout.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            scratch: [0; STAGING_LEN],
            info: None,
        }
    }

    /// Set the silence window a read tolerates before giving up.
    ///
    /// The deadline restarts whenever at least one byte arrives, so a
    /// trickling response can legitimately take longer than the window; only
    /// contiguous silence of this duration fails the read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Device info captured by the last successful [`open`](Self::open).
    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.info.as_ref()
    }

    /// Borrow the transport, e.g. to retune a serial port after
    /// [`set_baud_rate`](Self::set_baud_rate).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear down and hand the transport back.
    pub fn into_transport(self) -> T {
        self.transport
    }

    // Session

    /// Open a session and fetch the device info record.
    pub async fn open(&mut self) -> Result<DeviceInfo> {
        debug!("Opening session on {}...", self.transport.describe());

        // Parameter 1 asks the sensor to follow the ACK with its info record.
        self.exchange(Opcode::Open, 1).await?;

        let mut record = [0u8; DeviceInfo::SIZE];
        self.read_raw(&mut record).await?;
        let info = DeviceInfo::parse(&record)?;

        debug!("Session open: {}", info);
        self.info = Some(info);
        Ok(info)
    }

    /// Close the session.
    pub async fn close(&mut self) -> Result<()> {
        debug!("Closing session...");
        self.exchange(Opcode::Close, 0).await?;
        Ok(())
    }

    // Device control

    /// Switch the CMOS LED on or off.
    pub async fn set_led(&mut self, on: bool) -> Result<()> {
        debug!("Setting LED {}", if on { "on" } else { "off" });
        self.exchange(Opcode::CmosLed, on as u32).await?;
        Ok(())
    }

    /// Change the sensor's UART baud rate.
    ///
    /// On success the sensor switches immediately; reconfigure the transport
    /// to match before the next exchange.
    pub async fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        debug!("Changing sensor baud rate to {}", baud);
        self.exchange(Opcode::ChangeBaudRate, baud).await?;
        Ok(())
    }

    // Enrollment

    /// Number of enrolled fingerprints.
    pub async fn enrolled_count(&mut self) -> Result<u16> {
        let count = self.exchange(Opcode::GetEnrollCount, 0).await?;
        Ok(count as u16)
    }

    /// Whether a template is stored at `id`.
    pub async fn is_enrolled(&mut self, id: u16) -> Result<bool> {
        match self.exchange(Opcode::CheckEnrolled, id as u32).await {
            Ok(_) => Ok(true),
            Err(Error::Device(gt5x_core::DeviceError::IsNotUsed)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Begin enrolling a finger at `id`.
    pub async fn start_enroll(&mut self, id: u16) -> Result<()> {
        debug!("Starting enrollment for id {}", id);
        self.exchange(Opcode::EnrollStart, id as u32).await?;
        Ok(())
    }

    /// Take one of the three enrollment scans. Capture the finger first.
    pub async fn enroll_scan(&mut self, stage: EnrollStage) -> Result<()> {
        debug!("Enrollment scan {:?}", stage);
        self.exchange(stage.opcode(), 0).await?;
        Ok(())
    }

    /// Whether a finger currently rests on the sensor window.
    pub async fn is_pressed(&mut self) -> Result<bool> {
        let parameter = self.exchange(Opcode::IsPressFinger, 0).await?;
        Ok(parameter == 0)
    }

    // Database

    /// Delete the template at `id`.
    pub async fn delete(&mut self, id: u16) -> Result<()> {
        debug!("Deleting template {}", id);
        self.exchange(Opcode::DeleteId, id as u32).await?;
        Ok(())
    }

    /// Delete every stored template.
    pub async fn delete_all(&mut self) -> Result<()> {
        debug!("Emptying template database");
        self.exchange(Opcode::DeleteAll, 0).await?;
        Ok(())
    }

    // Matching

    /// 1:1 match of the captured finger against the template at `id`.
    pub async fn verify(&mut self, id: u16) -> Result<()> {
        self.exchange(Opcode::Verify, id as u32).await?;
        Ok(())
    }

    /// 1:N search of the database for the captured finger, returning the
    /// matched ID.
    pub async fn identify(&mut self) -> Result<u16> {
        let id = self.exchange(Opcode::Identify, 0).await?;
        Ok(id as u16)
    }

    /// Capture a fingerprint image. High quality takes longer and is meant
    /// for enrollment; the fast path is for matching.
    pub async fn capture_finger(&mut self, high_quality: bool) -> Result<()> {
        self.exchange(Opcode::CaptureFinger, high_quality as u32)
            .await?;
        Ok(())
    }

    // Templates and images

    /// Build a download-ready template from the captured finger. Fetch it
    /// with [`read_raw`](Self::read_raw) afterwards.
    pub async fn make_template(&mut self) -> Result<()> {
        self.exchange(Opcode::MakeTemplate, 0).await?;
        Ok(())
    }

    /// Start downloading the template stored at `id`; the template bytes
    /// follow as a data frame, fetched with [`read_raw`](Self::read_raw).
    pub async fn get_template(&mut self, id: u16) -> Result<()> {
        debug!("Downloading template {}", id);
        self.exchange(Opcode::GetTemplate, id as u32).await?;
        Ok(())
    }

    /// Start uploading a template to `id`; send the bytes with
    /// [`write_raw`](Self::write_raw) afterwards.
    ///
    /// With `check_duplicate` off, the vendor flag byte in the parameter's
    /// high byte tells the sensor to skip its duplicate-finger scan.
    pub async fn set_template(&mut self, id: u16, check_duplicate: bool) -> Result<()> {
        debug!("Uploading template to {}", id);
        let mut parameter = id as u32;
        if !check_duplicate {
            parameter |= 0xFF00_0000;
        }
        self.exchange(Opcode::SetTemplate, parameter).await?;
        Ok(())
    }

    /// Capture and start downloading a raw image; the pixels follow as a
    /// data frame, usually fetched with [`read_raw_to`](Self::read_raw_to).
    pub async fn get_raw_image(&mut self) -> Result<()> {
        debug!("Capturing raw image");
        self.exchange(Opcode::GetRawImage, 0).await?;
        Ok(())
    }

    // Raw primitives

    /// Read a data frame whose payload fills `dest` exactly, verifying the
    /// checksum. Returns the payload length.
    pub async fn read_raw(&mut self, dest: &mut [u8]) -> Result<usize> {
        let len = dest.len();
        self.read_data_frame(len, DataOut::Buffer(dest)).await
    }

    /// Read a data frame of `len` payload bytes, relaying them to `sink` in
    /// chunks bounded by the staging buffer.
    ///
    /// Bytes are forwarded as they arrive, so the checksum cannot be
    /// enforced: a corrupt trailing checksum is not detected, and bytes
    /// already handed to the sink are never rolled back. Sink failures are
    /// logged and swallowed.
    pub async fn read_raw_to(&mut self, len: usize, sink: &mut (dyn Sink + '_)) -> Result<usize> {
        self.read_data_frame(len, DataOut::Stream(sink)).await
    }

    /// Send a data frame carrying `data`, optionally waiting for the
    /// sensor's reply to it.
    pub async fn write_raw(&mut self, data: &[u8], expect_response: bool) -> Result<()> {
        let frame = packet::encode_data_frame(data);
        trace!("Sending data frame: {} payload bytes", data.len());
        self.transport.write_all(&frame).await?;

        if expect_response {
            let reply = self.read_reply().await?;
            if !reply.is_ack() {
                return Err(Error::Device(reply.error()));
            }
        }
        Ok(())
    }

    // Engine

    /// One command/reply exchange. Returns the reply parameter on ACK and
    /// maps a NACK's parameter word to [`Error::Device`].
    async fn exchange(&mut self, opcode: Opcode, parameter: u32) -> Result<u32> {
        self.send_command(opcode, parameter).await?;
        let reply = self.read_reply().await?;

        if reply.is_ack() {
            Ok(reply.parameter)
        } else {
            warn!("{} refused: {}", opcode, reply.error());
            Err(Error::Device(reply.error()))
        }
    }

    async fn send_command(&mut self, opcode: Opcode, parameter: u32) -> Result<()> {
        let packet = CommandPacket::new(opcode, parameter);
        let bytes = packet.encode();
        trace!("Sending {}: {}", packet, hex::encode(&bytes));
        self.transport.write_all(&bytes).await?;
        Ok(())
    }

    /// Pull the next run of bytes into the staging buffer, or fail with the
    /// timeout sentinel after a full silence window. Waiting yields to the
    /// scheduler; nothing here spins.
    async fn next_chunk(&mut self) -> Result<usize> {
        match tokio::time::timeout(self.timeout, self.transport.read(&mut self.scratch)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                debug!("Read timed out after {:?} of silence", self.timeout);
                Err(Error::Timeout(self.timeout))
            }
        }
    }

    /// Read until a complete, checksum-valid reply packet is assembled.
    /// Framing errors resynchronize silently and burn timeout budget only.
    async fn read_reply(&mut self) -> Result<Reply> {
        let mut decoder = FrameDecoder::reply();
        let mut payload = [0u8; gt5x_core::constants::REPLY_PAYLOAD_LEN];
        let mut filled = 0;

        loop {
            let n = self.next_chunk().await?;
            let mut pos = 0;

            while pos < n {
                let (used, progress) = decoder.advance(&self.scratch[pos..n]);
                pos += used;

                match progress {
                    Progress::Payload(chunk) => {
                        payload[filled..filled + chunk.len()].copy_from_slice(chunk);
                        filled += chunk.len();
                    }
                    Progress::Restarted => filled = 0,
                    Progress::Complete => {
                        let reply = Reply::parse(&payload)?;
                        trace!("Received {}", reply);
                        return Ok(reply);
                    }
                    Progress::Incomplete => {}
                }
            }
        }
    }

    /// Read one data frame of exactly `len` payload bytes into `out`.
    /// Buffer mode verifies the checksum; stream mode cannot and does not.
    async fn read_data_frame(&mut self, len: usize, mut out: DataOut<'_>) -> Result<usize> {
        let verify = matches!(out, DataOut::Buffer(_));
        let mut decoder = FrameDecoder::data(len, verify);
        let mut filled = 0usize;

        loop {
            let n = self.next_chunk().await?;
            let mut pos = 0;

            while pos < n {
                let (used, progress) = decoder.advance(&self.scratch[pos..n]);
                pos += used;

                match progress {
                    Progress::Payload(chunk) => {
                        match &mut out {
                            DataOut::Buffer(dest) => {
                                dest[filled..filled + chunk.len()].copy_from_slice(chunk);
                            }
                            DataOut::Stream(sink) => {
                                if let Err(e) = sink.write(chunk).await {
                                    warn!("Data sink failed, dropping chunk: {}", e);
                                }
                            }
                        }
                        filled += chunk.len();
                    }
                    // A frame died on its checksum; start the payload over.
                    // Bytes a sink already received stay where they are.
                    Progress::Restarted => filled = 0,
                    Progress::Complete => {
                        trace!("Data frame complete: {} bytes", len);
                        return Ok(len);
                    }
                    Progress::Incomplete => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gt5x_transport::MockTransport;

    #[test]
    fn sensor_create() {
        let sensor = Sensor::new(MockTransport::new());
        assert!(sensor.device_info().is_none());
    }

    #[test]
    fn enroll_stage_opcodes() {
        assert_eq!(EnrollStage::First.opcode(), Opcode::Enroll1);
        assert_eq!(EnrollStage::Second.opcode(), Opcode::Enroll2);
        assert_eq!(EnrollStage::Third.opcode(), Opcode::Enroll3);
    }
}
