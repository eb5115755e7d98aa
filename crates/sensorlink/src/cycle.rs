use std::fmt::Write as _;

use sensorlink_frame::{encode_record, FrameError, Record};
use sensorlink_transport::{SerialLink, TransportError};
use serde::{Serialize, Serializer};

/// Anything that accepts one complete frame and reports the bytes taken.
///
/// [`SerialLink`] is the production implementation; tests substitute mocks.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &[u8]) -> sensorlink_transport::Result<usize>;
}

impl FrameSink for SerialLink {
    fn write_frame(&mut self, frame: &[u8]) -> sensorlink_transport::Result<usize> {
        SerialLink::write_frame(self, frame)
    }
}

/// What one cycle did: the transmitted frame, or the failure that stopped it.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Sent {
        bytes_written: usize,
        frame_hex: String,
    },
    EncodeFailed {
        #[serde(serialize_with = "display_string")]
        reason: FrameError,
    },
    WriteFailed {
        #[serde(serialize_with = "display_string")]
        reason: TransportError,
    },
}

/// Per-cycle report: the record's fields plus the outcome.
#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub category: u8,
    pub signal_strength: i8,
    pub payload_length: u16,
    pub captured_at: u32,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Sent { .. })
    }
}

/// Run one record through encode → write and report the result.
///
/// The only component that sequences the codec and the transport; it does
/// no transformation of its own. Every failure is absorbed into the report;
/// nothing propagates past one cycle and nothing is retried. The record,
/// payload buffer included, is dropped when this returns.
pub fn run_cycle<S: FrameSink>(sink: &mut S, record: Record) -> CycleReport {
    let category = record.category;
    let signal_strength = record.signal_strength;
    let payload_length = record.payload_length;
    let captured_at = record.captured_at;

    let outcome = match encode_record(&record) {
        Err(err) => CycleOutcome::EncodeFailed { reason: err },
        Ok(frame) => match sink.write_frame(frame.as_bytes()) {
            Ok(bytes_written) => CycleOutcome::Sent {
                bytes_written,
                frame_hex: hex_dump(frame.as_bytes()),
            },
            Err(err) => CycleOutcome::WriteFailed { reason: err },
        },
    };

    CycleReport {
        category,
        signal_strength,
        payload_length,
        captured_at,
        outcome,
    }
}

/// Uppercase, space-separated hex rendering of a frame.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}

fn display_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
