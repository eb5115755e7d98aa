use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sensorlink_frame::Record;

/// Synthetic measurement source: one random, well-formed record per call.
///
/// Stands in for real sensor hardware. Field distributions match the
/// reference generator: any category, signal strength in [-100, 0] dBm,
/// payload of 1 to 10 random bytes, capture time = now.
pub struct RecordSource {
    rng: StdRng,
}

impl RecordSource {
    /// Entropy-seeded source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible record streams.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the next record. Always well-formed: the declared payload
    /// length is taken from the payload itself.
    pub fn next_record(&mut self) -> Record {
        let len = self.rng.gen_range(1..=10usize);
        let mut payload = vec![0u8; len];
        self.rng.fill(payload.as_mut_slice());
        let payload = Bytes::from(payload);

        Record {
            category: self.rng.gen(),
            signal_strength: self.rng.gen_range(-100..=0),
            payload_length: payload.len() as u16,
            payload,
            captured_at: unix_now(),
        }
    }
}

impl Default for RecordSource {
    fn default() -> Self {
        Self::new()
    }
}

pub fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
