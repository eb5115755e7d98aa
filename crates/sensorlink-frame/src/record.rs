use bytes::Bytes;

use crate::codec::FIXED_OVERHEAD;
use crate::error::{FrameError, Result};

/// One sensor measurement, the unit of transmission.
///
/// `payload_length` is carried as its own field because it is a wire field;
/// it must always equal `payload.len()`. [`Record::new`] keeps the two in
/// sync, and [`encode_record`](crate::codec::encode_record) rejects records
/// where they have drifted apart.
///
/// A record is created fresh per cycle, consumed once by the encoder, and
/// dropped when the cycle ends; the payload buffer goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Measurement category tag.
    pub category: u8,
    /// Received signal strength in dBm. Generators keep this in [-100, 0];
    /// the codec does not care.
    pub signal_strength: i8,
    /// Declared payload length in bytes.
    pub payload_length: u16,
    /// Raw measurement bytes, owned by the record for its lifetime.
    pub payload: Bytes,
    /// Capture time, seconds since the Unix epoch.
    pub captured_at: u32,
}

impl Record {
    /// Create a record with `payload_length` derived from the payload.
    ///
    /// Fails with [`FrameError::PayloadTooLarge`] when the payload does not
    /// fit the 16-bit length field.
    pub fn new(
        category: u8,
        signal_strength: i8,
        payload: impl Into<Bytes>,
        captured_at: u32,
    ) -> Result<Self> {
        let payload = payload.into();
        let payload_length =
            u16::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
                size: payload.len(),
                max: u16::MAX as usize,
            })?;
        Ok(Self {
            category,
            signal_strength,
            payload_length,
            payload,
            captured_at,
        })
    }

    /// The total wire size of this record once framed (fixed fields + payload).
    pub fn wire_size(&self) -> usize {
        FIXED_OVERHEAD + self.payload.len()
    }
}
