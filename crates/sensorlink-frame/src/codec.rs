use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::checksum::xor_checksum;
use crate::error::{FrameError, Result};
use crate::record::Record;

/// Fixed wire overhead: category (1) + signal strength (1) +
/// payload length (2) + capture time (4) + checksum (1).
pub const FIXED_OVERHEAD: usize = 9;

/// Offset of the 16-bit payload length field.
pub const LENGTH_OFFSET: usize = 2;

/// Offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = 4;

/// Maximum payload size representable in the length field.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// A fully serialized record, ready for transmission.
///
/// Ephemeral: built by [`encode_record`], handed to the transport for one
/// write, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Total frame length on the wire.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The frame's wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the frame and return its wire bytes.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encode a record into the wire format.
///
/// Wire format (multi-byte fields little-endian, pinned independent of the
/// host byte order):
/// ```text
/// ┌──────────┬────────────┬──────────┬─────────────┬────────────┬──────────┐
/// │ Category │ Signal     │ Length   │ Payload     │ Captured   │ Checksum │
/// │ (1B)     │ (1B, i8)   │ (2B LE)  │ (Length B)  │ (4B LE)    │ (1B XOR) │
/// └──────────┴────────────┴──────────┴─────────────┴────────────┴──────────┘
/// ```
///
/// The checksum is the XOR fold of every byte preceding it, so it covers
/// exactly `frame_len - 1` bytes — a zero-length payload included.
///
/// Fails with [`FrameError::InvalidRecord`] when the record's declared
/// payload length disagrees with its payload, and never produces a partial
/// frame: an unsatisfiable buffer reservation reports
/// [`FrameError::Allocation`].
pub fn encode_record(record: &Record) -> Result<Frame> {
    let actual = record.payload.len();
    if actual > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: actual,
            max: MAX_PAYLOAD,
        });
    }
    if record.payload_length as usize != actual {
        return Err(FrameError::InvalidRecord {
            declared: record.payload_length,
            actual,
        });
    }

    let total = FIXED_OVERHEAD + actual;
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(total)
        .map_err(|_| FrameError::Allocation { bytes: total })?;

    buf.put_u8(record.category);
    buf.put_i8(record.signal_strength);
    buf.put_u16_le(record.payload_length);
    if !record.payload.is_empty() {
        buf.put_slice(&record.payload);
    }
    buf.put_u32_le(record.captured_at);

    let sum = xor_checksum(&buf);
    buf.put_u8(sum);

    Ok(Frame {
        bytes: Bytes::from(buf),
    })
}

/// Decode one frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, verifies the trailing checksum and consumes the frame bytes
/// from the buffer.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Record>> {
    if src.len() < FIXED_OVERHEAD {
        return Ok(None); // Need more data
    }

    let payload_len = u16::from_le_bytes([src[LENGTH_OFFSET], src[LENGTH_OFFSET + 1]]) as usize;
    let total = FIXED_OVERHEAD + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let expected = src[total - 1];
    let computed = xor_checksum(&src[..total - 1]);
    if computed != expected {
        return Err(FrameError::ChecksumMismatch { expected, computed });
    }

    let category = src.get_u8();
    let signal_strength = src.get_i8();
    let payload_length = src.get_u16_le();
    let payload = src.split_to(payload_len).freeze();
    let captured_at = src.get_u32_le();
    src.advance(1); // checksum, verified above

    Ok(Some(Record {
        category,
        signal_strength,
        payload_length,
        payload,
        captured_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record::new(5, -42, vec![0xAA, 0xBB, 0xCC], 1000).unwrap()
    }

    #[test]
    fn encode_matches_worked_example() {
        let frame = encode_record(&sample_record()).unwrap();
        // 05 D6 03 00 AA BB CC E8 03 00 00, XOR of those eleven bytes = E6.
        assert_eq!(
            frame.as_bytes(),
            &[0x05, 0xD6, 0x03, 0x00, 0xAA, 0xBB, 0xCC, 0xE8, 0x03, 0x00, 0x00, 0xE6]
        );
    }

    #[test]
    fn frame_length_is_overhead_plus_payload() {
        for len in [0usize, 1, 10, 255, 300] {
            let record = Record::new(9, -70, vec![0x42; len], 77).unwrap();
            let frame = encode_record(&record).unwrap();
            assert_eq!(frame.len(), FIXED_OVERHEAD + len);
        }
    }

    #[test]
    fn trailing_byte_checksums_the_rest() {
        let frame = encode_record(&sample_record()).unwrap();
        let bytes = frame.as_bytes();
        assert_eq!(bytes[bytes.len() - 1], xor_checksum(&bytes[..bytes.len() - 1]));
    }

    #[test]
    fn empty_payload_encodes_to_nine_bytes() {
        let record = Record::new(0, -100, Bytes::new(), u32::MAX).unwrap();
        let frame = encode_record(&record).unwrap();
        assert_eq!(frame.len(), FIXED_OVERHEAD);
        let bytes = frame.as_bytes();
        assert_eq!(bytes[8], xor_checksum(&bytes[..8]));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let record = sample_record();
        let frame = encode_record(&record).unwrap();

        let mut buf = BytesMut::from(frame.as_bytes());
        let decoded = decode_frame(&mut buf).unwrap().unwrap();

        assert_eq!(decoded, record);
        assert!(buf.is_empty());
    }

    #[test]
    fn roundtrip_preserves_extreme_field_values() {
        let record = Record::new(255, -128, vec![0x00, 0xFF], u32::MAX).unwrap();
        let frame = encode_record(&record).unwrap();

        let mut buf = BytesMut::from(frame.as_bytes());
        let decoded = decode_frame(&mut buf).unwrap().unwrap();

        assert_eq!(decoded.category, 255);
        assert_eq!(decoded.signal_strength, -128);
        assert_eq!(decoded.payload.as_ref(), &[0x00, 0xFF]);
        assert_eq!(decoded.captured_at, u32::MAX);
    }

    #[test]
    fn mismatched_length_is_rejected() {
        let mut record = sample_record();
        record.payload_length = 7;

        let err = encode_record(&record).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidRecord {
                declared: 7,
                actual: 3
            }
        ));
    }

    #[test]
    fn decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x05, 0xD6, 0x03][..]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_incomplete_payload() {
        let frame = encode_record(&sample_record()).unwrap();
        let mut buf = BytesMut::from(&frame.as_bytes()[..frame.len() - 2]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_rejects_corrupted_checksum() {
        let frame = encode_record(&sample_record()).unwrap();
        let mut corrupted = frame.as_bytes().to_vec();
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;

        let mut buf = BytesMut::from(corrupted.as_slice());
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
    }

    #[test]
    fn decode_rejects_corrupted_body() {
        let frame = encode_record(&sample_record()).unwrap();
        let mut corrupted = frame.as_bytes().to_vec();
        corrupted[PAYLOAD_OFFSET] ^= 0x01;

        let mut buf = BytesMut::from(corrupted.as_slice());
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
    }

    #[test]
    fn decode_consumes_frames_in_sequence() {
        let first = Record::new(1, -10, vec![0x01], 100).unwrap();
        let second = Record::new(2, -20, vec![0x02, 0x03], 200).unwrap();

        let mut buf = BytesMut::new();
        buf.extend_from_slice(encode_record(&first).unwrap().as_bytes());
        buf.extend_from_slice(encode_record(&second).unwrap().as_bytes());

        let d1 = decode_frame(&mut buf).unwrap().unwrap();
        let d2 = decode_frame(&mut buf).unwrap().unwrap();

        assert_eq!(d1, first);
        assert_eq!(d2, second);
        assert!(buf.is_empty());
    }

    #[test]
    fn frame_into_bytes_keeps_contents() {
        let frame = encode_record(&sample_record()).unwrap();
        let len = frame.len();
        let bytes = frame.into_bytes();
        assert_eq!(bytes.len(), len);
        assert!(!bytes.is_empty());
    }
}
