use biomint::config::BiomintConfig;
use std::path::Path;

/// Write the commented default configuration to `config_path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn execute(config_path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() && !force {
        return Err(format!(
            "Config file '{}' already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }

    BiomintConfig::create_default(config_path)?;
    println!("📝 Wrote default configuration to {}", config_path.display());
    Ok(())
}
