use std::path::PathBuf;

/// Errors that can occur on the serial transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The device could not be acquired (missing, busy, or permission denied).
    #[error("serial device unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested line speed has no termios constant.
    #[error("unsupported baud rate: {baud}")]
    UnsupportedBaud { baud: u32 },

    /// The device was acquired but the write itself failed.
    #[error("serial write failed: {source}")]
    WriteFailed { source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, TransportError>;
