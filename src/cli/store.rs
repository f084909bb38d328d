use super::output::{print_json, warn_if_synthetic};
use biomint::config::BiomintConfig;
use biomint::storage::ContentStorageClient;
use std::io::Read;

/// Upload `input` ("-" for stdin) and print the stored asset.
pub async fn execute(
    config: &BiomintConfig,
    input: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_input(input)?;

    if json {
        serde_json::from_slice::<serde_json::Value>(&bytes)
            .map_err(|e| format!("Input is not valid JSON: {}", e))?;
    }

    let client = ContentStorageClient::from_config(&config.storage)?;
    let asset = client.store(&bytes).await?;

    warn_if_synthetic(asset.provenance(), "content identifier");
    print_json(&asset)
}

pub fn read_input(input: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        std::fs::read(input).map_err(|e| format!("Failed to read '{}': {}", input, e).into())
    }
}
