//! Valence/arousal/dominance emotion vectors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const VALENCE_RANGE: RangeInclusive<f32> = -1.0..=1.0;
pub const AROUSAL_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const DOMINANCE_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Arousal above this counts as activated.
const AROUSAL_ACTIVATION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEmotionVector")]
pub struct EmotionVector {
    /// Unpleasant (-1) to pleasant (1).
    pub valence: f32,
    /// Calm (0) to excited (1).
    pub arousal: f32,
    /// Controlled (0) to in control (1).
    pub dominance: f32,
}

impl EmotionVector {
    /// Build a vector, clamping each component into its range.
    ///
    /// NaN components become the neutral value (0.0 valence, 0.5 otherwise).
    pub fn new(valence: f32, arousal: f32, dominance: f32) -> Self {
        Self {
            valence: clamp_or(valence, &VALENCE_RANGE, 0.0),
            arousal: clamp_or(arousal, &AROUSAL_RANGE, 0.5),
            dominance: clamp_or(dominance, &DOMINANCE_RANGE, 0.5),
        }
    }

    pub fn neutral() -> Self {
        Self::new(0.0, 0.5, 0.5)
    }

    pub fn is_within_range(&self) -> bool {
        VALENCE_RANGE.contains(&self.valence)
            && AROUSAL_RANGE.contains(&self.arousal)
            && DOMINANCE_RANGE.contains(&self.dominance)
    }

    /// Quadrant of the valence/arousal plane.
    pub fn category(&self) -> EmotionCategory {
        match (self.valence > 0.0, self.arousal > AROUSAL_ACTIVATION) {
            (true, true) => EmotionCategory::Excited,
            (true, false) => EmotionCategory::Happy,
            (false, true) => EmotionCategory::Anxious,
            (false, false) => EmotionCategory::Calm,
        }
    }
}

/// Wire form; every decoded vector goes through `EmotionVector::new`.
#[derive(Deserialize)]
struct RawEmotionVector {
    valence: f32,
    arousal: f32,
    dominance: f32,
}

impl From<RawEmotionVector> for EmotionVector {
    fn from(raw: RawEmotionVector) -> Self {
        Self::new(raw.valence, raw.arousal, raw.dominance)
    }
}

fn clamp_or(value: f32, range: &RangeInclusive<f32>, neutral: f32) -> f32 {
    if value.is_nan() {
        neutral
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Excited,
    Happy,
    Anxious,
    Calm,
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Excited => "excited",
            Self::Happy => "happy",
            Self::Anxious => "anxious",
            Self::Calm => "calm",
        };
        f.write_str(name)
    }
}
