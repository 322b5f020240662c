//! Error types for gt5x-core

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Opcode value not in the vendor command table
    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u16),

    /// Reply payload of the wrong size was handed to the parser
    #[error("Reply payload must be {expected} bytes, got {actual}")]
    BadReplyLength { expected: usize, actual: usize },
}
