//! GT5X command opcode definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command opcodes
///
/// All opcodes from the GT-511C3 / GT-521F programming guide. A few are kept
/// for completeness even though the sensors reject them (firmware upgrade) or
/// the vendor has deprecated them (whole-database download).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    /// Open a session, optionally requesting the device info record
    Open = 0x01,
    /// Close the session
    Close = 0x02,
    /// Check that the connected USB device is valid
    UsbInternalCheck = 0x03,
    /// Change the UART baud rate
    ChangeBaudRate = 0x04,
    /// Enter IAP mode for firmware upgrade
    SetIapMode = 0x05,
    /// CMOS LED control
    CmosLed = 0x12,
    /// Number of enrolled fingerprints
    GetEnrollCount = 0x20,
    /// Check whether a specific ID is enrolled
    CheckEnrolled = 0x21,
    /// Start an enrollment
    EnrollStart = 0x22,
    /// First enrollment scan
    Enroll1 = 0x23,
    /// Second enrollment scan
    Enroll2 = 0x24,
    /// Third enrollment scan, merge and save
    Enroll3 = 0x25,
    /// Check if a finger rests on the sensor
    IsPressFinger = 0x26,
    /// Delete one template by ID
    DeleteId = 0x40,
    /// Delete every template
    DeleteAll = 0x41,
    /// 1:1 match of the captured finger against one ID
    Verify = 0x50,
    /// 1:N search of the database for the captured finger
    Identify = 0x51,
    /// 1:1 match of a supplied template against one ID
    VerifyTemplate = 0x52,
    /// 1:N search of the database for a supplied template
    IdentifyTemplate = 0x53,
    /// Capture a fingerprint image
    CaptureFinger = 0x60,
    /// Build a template from the captured image, for download
    MakeTemplate = 0x61,
    /// Download the captured 256x256 image
    GetImage = 0x62,
    /// Capture and download a raw image
    GetRawImage = 0x63,
    /// Download the template at an ID
    GetTemplate = 0x70,
    /// Upload a template to an ID
    SetTemplate = 0x71,
    /// Start database download (obsolete)
    GetDatabaseStart = 0x72,
    /// End database download (obsolete)
    GetDatabaseEnd = 0x73,
}

impl Opcode {
    /// Vendor name for the opcode, as printed in the programming guide.
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "CMD_OPEN",
            Self::Close => "CMD_CLOSE",
            Self::UsbInternalCheck => "CMD_USB_INTERNAL_CHECK",
            Self::ChangeBaudRate => "CMD_CHANGE_BAUDRATE",
            Self::SetIapMode => "CMD_SET_IAP_MODE",
            Self::CmosLed => "CMD_CMOS_LED",
            Self::GetEnrollCount => "CMD_GET_ENROLL_COUNT",
            Self::CheckEnrolled => "CMD_CHECK_ENROLLED",
            Self::EnrollStart => "CMD_ENROLL_START",
            Self::Enroll1 => "CMD_ENROLL_1",
            Self::Enroll2 => "CMD_ENROLL_2",
            Self::Enroll3 => "CMD_ENROLL_3",
            Self::IsPressFinger => "CMD_IS_PRESS_FINGER",
            Self::DeleteId => "CMD_DELETE_ID",
            Self::DeleteAll => "CMD_DELETE_ALL",
            Self::Verify => "CMD_VERIFY",
            Self::Identify => "CMD_IDENTIFY",
            Self::VerifyTemplate => "CMD_VERIFY_TEMPLATE",
            Self::IdentifyTemplate => "CMD_IDENTIFY_TEMPLATE",
            Self::CaptureFinger => "CMD_CAPTURE_FINGER",
            Self::MakeTemplate => "CMD_MAKE_TEMPLATE",
            Self::GetImage => "CMD_GET_IMAGE",
            Self::GetRawImage => "CMD_GET_RAW_IMAGE",
            Self::GetTemplate => "CMD_GET_TEMPLATE",
            Self::SetTemplate => "CMD_SET_TEMPLATE",
            Self::GetDatabaseStart => "CMD_GET_DATABASE_START",
            Self::GetDatabaseEnd => "CMD_GET_DATABASE_END",
        }
    }
}

impl From<Opcode> for u16 {
    fn from(op: Opcode) -> u16 {
        op as u16
    }
}

impl TryFrom<u16> for Opcode {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Open),
            0x02 => Ok(Self::Close),
            0x03 => Ok(Self::UsbInternalCheck),
            0x04 => Ok(Self::ChangeBaudRate),
            0x05 => Ok(Self::SetIapMode),
            0x12 => Ok(Self::CmosLed),
            0x20 => Ok(Self::GetEnrollCount),
            0x21 => Ok(Self::CheckEnrolled),
            0x22 => Ok(Self::EnrollStart),
            0x23 => Ok(Self::Enroll1),
            0x24 => Ok(Self::Enroll2),
            0x25 => Ok(Self::Enroll3),
            0x26 => Ok(Self::IsPressFinger),
            0x40 => Ok(Self::DeleteId),
            0x41 => Ok(Self::DeleteAll),
            0x50 => Ok(Self::Verify),
            0x51 => Ok(Self::Identify),
            0x52 => Ok(Self::VerifyTemplate),
            0x53 => Ok(Self::IdentifyTemplate),
            0x60 => Ok(Self::CaptureFinger),
            0x61 => Ok(Self::MakeTemplate),
            0x62 => Ok(Self::GetImage),
            0x63 => Ok(Self::GetRawImage),
            0x70 => Ok(Self::GetTemplate),
            0x71 => Ok(Self::SetTemplate),
            0x72 => Ok(Self::GetDatabaseStart),
            0x73 => Ok(Self::GetDatabaseEnd),
            other => Err(Error::UnknownOpcode(other)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
