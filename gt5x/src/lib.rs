//! # gt5x
//!
//! Driver for GT5X serial fingerprint sensor modules (GT-511C3,
//! GT-521F32/F52).
//!
//! ## Features
//!
//! - Byte-incremental packet decoding with automatic resynchronization
//! - Silence-based timeouts that never block the executor
//! - The full command surface: enrollment, verification, identification,
//!   capture, template and raw-image transfer
//! - Buffered and streaming bulk data reads
//!
//! ## Quick start
//!
//! ```no_run
//! use gt5x::Sensor;
//! use gt5x_transport::SerialTransport;
//!
//! #[tokio::main]
//! async fn main() -> gt5x::Result<()> {
//!     let port = SerialTransport::open("/dev/ttyUSB0", 9600)?;
//!     let mut sensor = Sensor::new(port);
//!
//!     let info = sensor.open().await?;
//!     println!("{info}");
//!
//!     sensor.set_led(true).await?;
//!     if sensor.is_pressed().await? {
//!         sensor.capture_finger(false).await?;
//!         let id = sensor.identify().await?;
//!         println!("matched finger {id}");
//!     }
//!
//!     sensor.set_led(false).await?;
//!     sensor.close().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sensor;

// Re-exports
pub use error::{Error, Result};
pub use sensor::{EnrollStage, Sensor};

// Re-export protocol types
pub use gt5x_core::{DeviceError, Opcode, Reply};
pub use gt5x_transport::{Sink, Transport};
pub use gt5x_types::DeviceInfo;
