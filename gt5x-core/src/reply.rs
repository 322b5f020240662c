//! Command reply parsing and the NACK error-code table

use std::fmt;

use crate::constants::REPLY_PAYLOAD_LEN;
use crate::error::{Error, Result};

/// ACK response code
pub const ACK: u16 = 0x30;

/// NACK response code
pub const NACK: u16 = 0x31;

/// Parsed payload of a command reply packet.
///
/// The parameter word doubles as the output value on ACK and as the
/// [`DeviceError`] code on NACK; which reading applies is decided by the
/// response code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// Output parameter (ACK) or error code (NACK)
    pub parameter: u32,

    /// Response code, [`ACK`] or [`NACK`]
    pub code: u16,
}

impl Reply {
    /// Parse the 6-byte payload section of a reply packet.
    ///
    /// # Examples
    ///
    /// ```
    /// use gt5x_core::Reply;
    ///
    /// let reply = Reply::parse(&[0x07, 0x00, 0x00, 0x00, 0x30, 0x00]).unwrap();
    /// assert!(reply.is_ack());
    /// assert_eq!(reply.parameter, 7);
    /// ```
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != REPLY_PAYLOAD_LEN {
            return Err(Error::BadReplyLength {
                expected: REPLY_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        Ok(Self {
            parameter: u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]),
            code: u16::from_le_bytes([payload[4], payload[5]]),
        })
    }

    /// Whether the sensor acknowledged the command.
    ///
    /// Anything other than [`ACK`] is treated as a NACK and the parameter
    /// word is read as an error code.
    pub fn is_ack(self) -> bool {
        self.code == ACK
    }

    /// The parameter word read as a NACK error code.
    pub fn error(self) -> DeviceError {
        DeviceError::from(self.parameter)
    }
}

/// Error codes the sensor embeds in a NACK reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Capture timed out on the sensor
    #[error("capture timeout")]
    CaptureTimeout,

    /// Requested baud rate is not supported
    #[error("invalid baud rate")]
    InvalidBaudRate,

    /// Template position out of range
    #[error("invalid position")]
    InvalidPosition,

    /// Template position is not in use
    #[error("position is not used")]
    IsNotUsed,

    /// Template position is already in use
    #[error("position is already used")]
    IsAlreadyUsed,

    /// Communication error reported by the sensor
    #[error("communication error")]
    CommunicationError,

    /// 1:1 verification failed
    #[error("verify failed")]
    VerifyFailed,

    /// 1:N identification found no match
    #[error("identify failed")]
    IdentifyFailed,

    /// Template database is full
    #[error("database is full")]
    DatabaseFull,

    /// Template database is empty
    #[error("database is empty")]
    DatabaseEmpty,

    /// Enrollment scans taken out of order
    #[error("wrong enrollment turn")]
    TurnError,

    /// Fingerprint image too poor to use
    #[error("bad finger")]
    BadFinger,

    /// Enrollment failed
    #[error("enroll failed")]
    EnrollFailed,

    /// Command not supported by this sensor
    #[error("operation not supported")]
    NotSupported,

    /// Sensor hardware error
    #[error("device error")]
    HardwareError,

    /// Capture was canceled
    #[error("capture canceled")]
    CaptureCanceled,

    /// Invalid command parameter
    #[error("invalid parameter")]
    InvalidParameter,

    /// No finger on the sensor
    #[error("finger is not pressed")]
    FingerNotPressed,

    /// Code not in the vendor table
    #[error("unrecognized device error 0x{0:08X}")]
    Other(u32),
}

impl DeviceError {
    /// The raw error code as carried in the reply parameter word.
    pub fn code(self) -> u32 {
        match self {
            Self::CaptureTimeout => 0x1001,
            Self::InvalidBaudRate => 0x1002,
            Self::InvalidPosition => 0x1003,
            Self::IsNotUsed => 0x1004,
            Self::IsAlreadyUsed => 0x1005,
            Self::CommunicationError => 0x1006,
            Self::VerifyFailed => 0x1007,
            Self::IdentifyFailed => 0x1008,
            Self::DatabaseFull => 0x1009,
            Self::DatabaseEmpty => 0x100A,
            Self::TurnError => 0x100B,
            Self::BadFinger => 0x100C,
            Self::EnrollFailed => 0x100D,
            Self::NotSupported => 0x100E,
            Self::HardwareError => 0x100F,
            Self::CaptureCanceled => 0x1010,
            Self::InvalidParameter => 0x1011,
            Self::FingerNotPressed => 0x1012,
            Self::Other(code) => code,
        }
    }
}

impl From<u32> for DeviceError {
    fn from(code: u32) -> Self {
        match code {
            0x1001 => Self::CaptureTimeout,
            0x1002 => Self::InvalidBaudRate,
            0x1003 => Self::InvalidPosition,
            0x1004 => Self::IsNotUsed,
            0x1005 => Self::IsAlreadyUsed,
            0x1006 => Self::CommunicationError,
            0x1007 => Self::VerifyFailed,
            0x1008 => Self::IdentifyFailed,
            0x1009 => Self::DatabaseFull,
            0x100A => Self::DatabaseEmpty,
            0x100B => Self::TurnError,
            0x100C => Self::BadFinger,
            0x100D => Self::EnrollFailed,
            0x100E => Self::NotSupported,
            0x100F => Self::HardwareError,
            0x1010 => Self::CaptureCanceled,
            0x1011 => Self::InvalidParameter,
            0x1012 => Self::FingerNotPressed,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ack() {
            write!(f, "ACK(param=0x{:08X})", self.parameter)
        } else {
            write!(f, "NACK({})", self.error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_ack_reply() {
        let reply = Reply::parse(&[0x2A, 0x00, 0x00, 0x00, 0x30, 0x00]).unwrap();
        assert!(reply.is_ack());
        assert_eq!(reply.parameter, 42);
    }

    #[test]
    fn parse_nack_reply() {
        // NACK with DB empty
        let reply = Reply::parse(&[0x0A, 0x10, 0x00, 0x00, 0x31, 0x00]).unwrap();
        assert!(!reply.is_ack());
        assert_eq!(reply.error(), DeviceError::DatabaseEmpty);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(matches!(
            Reply::parse(&[0x00; 4]),
            Err(Error::BadReplyLength { expected: 6, actual: 4 })
        ));
    }

    #[test]
    fn device_error_roundtrip() {
        for code in 0x1001..=0x1012u32 {
            assert_eq!(DeviceError::from(code).code(), code);
        }
        assert_eq!(DeviceError::from(0xBEEF), DeviceError::Other(0xBEEF));
    }

    #[test]
    fn unknown_response_code_is_not_ack() {
        let reply = Reply::parse(&[0x00, 0x00, 0x00, 0x00, 0x99, 0x00]).unwrap();
        assert!(!reply.is_ack());
    }
}
