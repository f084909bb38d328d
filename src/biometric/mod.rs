//! Synthetic biometric samples for demos.
//!
//! Nothing here reads a sensor. Every sample is generated and marked
//! `Synthetic`.

pub mod emotion;
pub mod generator;

#[cfg(test)]
mod proptests;

pub use emotion::{EmotionCategory, EmotionVector};
pub use generator::{BiometricSample, BiometricSampleGenerator};
