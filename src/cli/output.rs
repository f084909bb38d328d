use biomint::Provenance;
use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Warn on stderr when a result was fabricated locally.
pub fn warn_if_synthetic(provenance: Provenance, what: &str) {
    if provenance.is_synthetic() {
        eprintln!("⚠️  {} is synthetic (not backed by a chain or storage network)", what);
    }
}
