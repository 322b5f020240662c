//! GT5X protocol constants
//!
//! Two synchronization pairs are in use on the wire: outgoing command packets
//! carry [`COMMAND_SYNC`], while command replies and bulk data frames from the
//! sensor both carry [`REPLY_SYNC`].

use std::time::Duration;

/// Sync pair opening every outgoing command packet.
pub const COMMAND_SYNC: [u8; 2] = [0x55, 0xAA];

/// Sync pair opening command replies and data frames.
pub const REPLY_SYNC: [u8; 2] = [0x5A, 0xA5];

/// Fixed device ID, little-endian on the wire.
pub const DEVICE_ID: u16 = 0x0001;

/// Total length of a command or command-reply packet.
pub const PACKET_LEN: usize = 12;

/// Payload section of a command reply: u32 parameter + u16 response code.
pub const REPLY_PAYLOAD_LEN: usize = 6;

/// Device info record carried by the data frame that follows OPEN.
pub const DEVICE_INFO_LEN: usize = 24;

/// Staging buffer used when relaying streamed data frames.
pub const STAGING_LEN: usize = 32;

/// Default silence window before a read gives up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);
