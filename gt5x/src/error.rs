//! High-level error types

use std::time::Duration;

use gt5x_core::DeviceError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] gt5x_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] gt5x_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] gt5x_types::Error),

    /// The sensor answered with a NACK carrying this error code.
    #[error("Sensor reported: {0}")]
    Device(DeviceError),

    /// No complete valid packet formed within the silence window. The only
    /// failure mode transport-level problems surface as.
    #[error("Timed out after {0:?} of silence")]
    Timeout(Duration),
}

impl Error {
    /// Whether this is the read-timeout sentinel.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// The NACK error code, if the sensor reported one.
    pub fn device_error(&self) -> Option<DeviceError> {
        match self {
            Self::Device(code) => Some(*code),
            _ => None,
        }
    }
}
