//! Checksummed wire framing for sensor telemetry records.
//!
//! Every measurement [`Record`] serializes into a self-contained frame:
//! fixed header fields (category, signal strength, payload length), the
//! variable-length payload, the capture timestamp, and a trailing XOR
//! checksum covering every byte before it.
//!
//! There is no magic number and no delimiter on the wire; a receiver
//! derives frame boundaries from the embedded payload length.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod record;

pub use checksum::xor_checksum;
pub use codec::{decode_frame, encode_record, Frame, FIXED_OVERHEAD, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use record::Record;
