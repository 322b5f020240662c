//! # gt5x-core
//!
//! Core protocol implementation for GT5X fingerprint sensor modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Command packet encoding
//! - Incremental frame decoding (command replies and bulk data)
//! - Checksum calculation
//! - Opcode and response-code definitions
//! - Protocol constants
//!
//! Everything here is sans-I/O: the [`FrameDecoder`] is fed byte slices and
//! never touches a transport. The `gt5x` crate wires it to a byte stream.

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod packet;
pub mod reply;

pub use command::Opcode;
pub use error::{Error, Result};
pub use frame::{FrameDecoder, Progress};
pub use packet::CommandPacket;
pub use reply::{DeviceError, Reply};

/// Protocol version information
pub const PROTOCOL_VERSION: &str = "1.0";
