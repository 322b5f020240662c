//! GT5X packet construction
//!
//! # Command packet structure
//!
//! ```text
//! ┌──────────┬─────────────┬─────────────┬───────────┬──────────┐
//! │   Sync   │  Device ID  │  Parameter  │  Opcode   │ Checksum │
//! │ 55 AA    │  2 bytes    │  4 bytes    │  2 bytes  │ 2 bytes  │
//! │          │  (LE u16)   │  (LE u32)   │ (LE u16)  │ (LE u16) │
//! └──────────┴─────────────┴─────────────┴───────────┴──────────┘
//! ```
//!
//! All multi-byte fields are little-endian. The checksum is the wrapping
//! 16-bit sum of the first ten bytes.

use bytes::{BufMut, BytesMut};
use std::fmt;

use crate::checksum;
use crate::command::Opcode;
use crate::constants::{COMMAND_SYNC, DEVICE_ID, PACKET_LEN, REPLY_SYNC};

/// An outgoing command packet
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CommandPacket {
    /// Command opcode
    pub opcode: Opcode,

    /// Command parameter (finger ID, baud rate, flag word, ...)
    pub parameter: u32,
}

impl CommandPacket {
    /// Create a new command packet.
    pub fn new(opcode: Opcode, parameter: u32) -> Self {
        Self { opcode, parameter }
    }

    /// Encode to the exact 12-byte wire form.
    ///
    /// # Examples
    ///
    /// ```
    /// use gt5x_core::{CommandPacket, Opcode};
    ///
    /// let bytes = CommandPacket::new(Opcode::Open, 1).encode();
    /// assert_eq!(bytes.len(), 12);
    /// assert_eq!(&bytes[..2], &[0x55, 0xAA]);
    /// ```
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(PACKET_LEN);

        buf.put_slice(&COMMAND_SYNC);
        buf.put_u16_le(DEVICE_ID);
        buf.put_u32_le(self.parameter);
        buf.put_u16_le(self.opcode.into());
        buf.put_u16_le(checksum::sum(&buf));

        buf
    }
}

impl fmt::Debug for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPacket")
            .field("opcode", &self.opcode)
            .field("parameter", &format!("0x{:08X}", self.parameter))
            .finish()
    }
}

impl fmt::Display for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:08X})", self.opcode, self.parameter)
    }
}

/// Encode an outgoing data frame carrying `payload`.
///
/// Data frames open with the reply/data sync pair in both directions; the
/// checksum covers the sync pair, the device ID and the whole payload.
pub fn encode_data_frame(payload: &[u8]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(4 + payload.len() + 2);

    buf.put_slice(&REPLY_SYNC);
    buf.put_u16_le(DEVICE_ID);
    buf.put_slice(payload);
    buf.put_u16_le(checksum::sum(&buf));

    buf
}
