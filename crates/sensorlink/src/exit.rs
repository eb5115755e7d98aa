use std::fmt;
use std::io;

use sensorlink_frame::FrameError;
use sensorlink_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match &err {
        TransportError::Unavailable { source, .. } | TransportError::WriteFailed { source } => {
            match source.kind() {
                io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
                _ => TRANSPORT_ERROR,
            }
        }
        TransportError::UnsupportedBaud { .. } => USAGE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    let code = match &err {
        FrameError::InvalidRecord { .. }
        | FrameError::PayloadTooLarge { .. }
        | FrameError::ChecksumMismatch { .. } => DATA_INVALID,
        FrameError::Allocation { .. } => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}
