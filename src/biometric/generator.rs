//! Synthetic biometric sample generator for demos.
//!
//! Samples are pseudo-random and always marked `Synthetic`. The only state
//! carried between calls is the RNG, a sequence counter and a monotonic clock
//! anchored when the generator is created.

use super::emotion::{EmotionVector, AROUSAL_RANGE, DOMINANCE_RANGE, VALENCE_RANGE};
use crate::provenance::Provenance;
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Instant;

pub const SIGNAL_QUALITY_RANGE: RangeInclusive<f32> = 0.6..=1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricSample {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub emotion: EmotionVector,
    pub signal_quality: f32,
    pub provenance: Provenance,
}

pub struct BiometricSampleGenerator {
    state: Mutex<GeneratorState>,
    origin: Instant,
    origin_wall: DateTime<Utc>,
}

struct GeneratorState {
    rng: StdRng,
    next_sequence: u64,
}

impl BiometricSampleGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator: equal seeds yield equal emotion sequences.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                rng,
                next_sequence: 0,
            }),
            origin: Instant::now(),
            origin_wall: Utc::now(),
        }
    }

    pub fn sample(&self) -> BiometricSample {
        // RNG state stays valid across a poisoned lock.
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let rng = &mut state.rng;
        let emotion = EmotionVector::new(
            rng.gen_range(VALENCE_RANGE),
            rng.gen_range(AROUSAL_RANGE),
            rng.gen_range(DOMINANCE_RANGE),
        );
        let signal_quality = rng.gen_range(SIGNAL_QUALITY_RANGE);

        BiometricSample {
            sequence,
            timestamp: self.now(),
            emotion,
            signal_quality,
            provenance: Provenance::Synthetic,
        }
    }

    /// `count` consecutive samples.
    pub fn series(&self, count: usize) -> Vec<BiometricSample> {
        (0..count).map(|_| self.sample()).collect()
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::microseconds(self.origin.elapsed().as_micros() as i64);
        self.origin_wall + elapsed
    }
}

impl Default for BiometricSampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}
