//! Device information record
//!
//! The sensor transmits this fixed 24-byte record in a data frame right after
//! a session is opened with the info flag set.

use std::fmt;

use crate::error::{Error, Result};

/// Device information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Firmware version
    pub firmware_version: u32,

    /// Maximum size of an ISO CD image / template area
    pub iso_area_max_size: u32,

    /// Device serial number
    pub serial_number: [u8; 16],
}

impl DeviceInfo {
    /// Wire size of the record: two u32 fields plus the serial number.
    pub const SIZE: usize = 24;

    /// Parse the record from its wire form (little-endian fields).
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(Error::Parse(format!(
                "device info record must be {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }

        let mut serial_number = [0u8; 16];
        serial_number.copy_from_slice(&bytes[8..24]);

        Ok(Self {
            firmware_version: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            iso_area_max_size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            serial_number,
        })
    }

    /// Serial number as lowercase hex.
    pub fn serial_hex(&self) -> String {
        hex::encode(self.serial_number)
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor[FW: 0x{:08X}, SN: {}]",
            self.firmware_version,
            self.serial_hex()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_record() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0103_0000u32.to_le_bytes());
        bytes.extend_from_slice(&498u32.to_le_bytes());
        bytes.extend_from_slice(&[0xAB; 16]);

        let info = DeviceInfo::parse(&bytes).unwrap();
        assert_eq!(info.firmware_version, 0x0103_0000);
        assert_eq!(info.iso_area_max_size, 498);
        assert_eq!(info.serial_number, [0xAB; 16]);
        assert_eq!(info.serial_hex(), "ab".repeat(16));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(DeviceInfo::parse(&[0u8; 23]).is_err());
        assert!(DeviceInfo::parse(&[0u8; 25]).is_err());
    }
}
