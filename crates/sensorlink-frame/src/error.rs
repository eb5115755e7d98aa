/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The record's declared payload length does not match its payload.
    #[error("invalid record: declared payload length {declared}, actual {actual}")]
    InvalidRecord { declared: u16, actual: usize },

    /// The payload exceeds what the 16-bit length field can represent.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The frame buffer could not be allocated.
    #[error("failed to allocate {bytes}-byte frame buffer")]
    Allocation { bytes: usize },

    /// The trailing checksum does not match the frame contents.
    #[error("checksum mismatch (frame carries 0x{expected:02X}, computed 0x{computed:02X})")]
    ChecksumMismatch { expected: u8, computed: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
