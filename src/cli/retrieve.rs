use biomint::config::BiomintConfig;
use biomint::storage::{Cid, ContentStorageClient};
use std::io::Write;
use std::path::PathBuf;

/// Download `cid` to `output` or stdout.
///
/// Fallback identifiers only exist inside the process that created them, so
/// a fresh CLI invocation can never resolve one.
pub async fn execute(
    config: &BiomintConfig,
    cid: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cid = Cid::parse(cid).ok_or("CID is empty")?;
    let client = ContentStorageClient::from_config(&config.storage)?;

    let bytes = client.retrieve(&cid).await?;

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes)
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            eprintln!("✅ Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}
