//! Serial transport for the sensor telemetry link.
//!
//! The device is a POSIX termios serial line, acquired per write: opened
//! write-only and non-blocking, line-configured, handed one frame, then
//! closed. No descriptor outlives a single [`SerialLink::write_frame`]
//! call, and release happens on every exit path, failure included.

pub mod error;
pub mod link;
pub mod serial;

pub use error::{Result, TransportError};
pub use link::SerialLink;
pub use serial::{validate_baud, SerialConfig, SerialPort, DEFAULT_BAUD};
