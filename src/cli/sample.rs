use super::output::print_json;
use biomint::biometric::BiometricSampleGenerator;

/// Print `count` generated samples.
pub fn execute(count: usize, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let generator = match seed {
        Some(seed) => BiometricSampleGenerator::seeded(seed),
        None => BiometricSampleGenerator::new(),
    };

    eprintln!("⚠️  biometric samples are generated, not measured");
    print_json(&generator.series(count))
}
