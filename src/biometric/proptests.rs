//! Property-based tests for generated samples
//!
//! - Range: every emotion component stays inside its documented range
//! - Clamping: any input to `EmotionVector::new` lands in range
//! - Ordering: sequence numbers strictly increase, timestamps never decrease

use super::emotion::{EmotionVector, AROUSAL_RANGE, DOMINANCE_RANGE, VALENCE_RANGE};
use super::generator::{BiometricSampleGenerator, SIGNAL_QUALITY_RANGE};
use proptest::prelude::*;

proptest! {
    /// Property: generated components stay in range for any seed
    #[test]
    fn generated_samples_stay_in_range(seed in any::<u64>(), count in 1usize..200) {
        let generator = BiometricSampleGenerator::seeded(seed);

        for sample in generator.series(count) {
            prop_assert!(VALENCE_RANGE.contains(&sample.emotion.valence));
            prop_assert!(AROUSAL_RANGE.contains(&sample.emotion.arousal));
            prop_assert!(DOMINANCE_RANGE.contains(&sample.emotion.dominance));
            prop_assert!(SIGNAL_QUALITY_RANGE.contains(&sample.signal_quality));
        }
    }

    /// Property: construction clamps arbitrary floats into range
    #[test]
    fn constructor_clamps_any_input(
        valence in any::<f32>(),
        arousal in any::<f32>(),
        dominance in any::<f32>(),
    ) {
        let v = EmotionVector::new(valence, arousal, dominance);
        prop_assert!(v.is_within_range());
    }

    /// Property: ordering holds for any series length
    #[test]
    fn series_is_ordered(seed in any::<u64>(), count in 2usize..100) {
        let samples = BiometricSampleGenerator::seeded(seed).series(count);

        for pair in samples.windows(2) {
            prop_assert!(pair[1].sequence > pair[0].sequence);
            prop_assert!(pair[1].timestamp >= pair[0].timestamp);
        }
    }
}
