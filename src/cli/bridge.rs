use super::output::{print_json, warn_if_synthetic};
use biomint::biometric::BiometricSampleGenerator;
use biomint::bridge::{MockBridgeClient, StreamRequest};
use biomint::config::BiomintConfig;
use biomint::storage::ContentStorageClient;
use biomint::wallet::{MockWalletConnector, RpcWalletConnector, WalletConnector};
use biomint::Chain;
use std::path::PathBuf;
use std::sync::Arc;

pub struct BridgeArgs {
    pub from: String,
    pub to: String,
    pub file: Option<PathBuf>,
    pub samples: Option<usize>,
    pub meta: Vec<String>,
    pub offline: bool,
}

/// Record one stream and print it.
///
/// The registry lives only for this invocation; the printed record is the
/// only lasting output.
pub async fn execute(config: &BiomintConfig, args: BridgeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source: Chain = args.from.parse()?;
    let target: Chain = args.to.parse()?;
    let payload = build_payload(args.file, args.samples)?;

    let mut request = StreamRequest::new(source, target, payload);
    for entry in &args.meta {
        let (key, value) = parse_meta(entry)?;
        request = request.with_metadata(key, value);
    }

    let wallets: Arc<dyn WalletConnector> = if args.offline {
        Arc::new(MockWalletConnector::with_all_chains())
    } else {
        Arc::new(RpcWalletConnector::new(config.wallet.clone()))
    };
    let storage = ContentStorageClient::from_config(&config.storage)?;
    let client = MockBridgeClient::new(wallets, Arc::new(storage));

    let id = client.submit(request).await?;
    let stream = client
        .get_stream(&id)
        .await
        .ok_or_else(|| format!("Stream {} vanished from the registry", id))?;

    warn_if_synthetic(stream.provenance, "stream");
    eprintln!("ℹ️  stream is recorded locally only; the target chain was not contacted");
    print_json(&stream)
}

fn build_payload(
    file: Option<PathBuf>,
    samples: Option<usize>,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match (file, samples) {
        (Some(path), _) => std::fs::read(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into()),
        (None, Some(count)) => {
            let samples = BiometricSampleGenerator::new().series(count);
            Ok(serde_json::to_vec(&samples)?)
        }
        (None, None) => Err("Provide a payload with --file or --samples".into()),
    }
}

fn parse_meta(entry: &str) -> Result<(String, String), Box<dyn std::error::Error>> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| format!("Metadata '{}' must be key=value", entry))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_args(from: &str, to: &str) -> BridgeArgs {
        BridgeArgs {
            from: from.to_string(),
            to: to.to_string(),
            file: None,
            samples: Some(2),
            meta: vec!["kind=emotion".to_string()],
            offline: true,
        }
    }

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("kind = emotion").unwrap(),
            ("kind".to_string(), "emotion".to_string())
        );
        assert_eq!(
            parse_meta("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert!(parse_meta("novalue").is_err());
    }

    #[test]
    fn test_payload_requires_a_source() {
        assert!(build_payload(None, None).is_err());
        let payload = build_payload(None, Some(3)).unwrap();
        let samples: Vec<serde_json::Value> = serde_json::from_slice(&payload).unwrap();
        assert_eq!(samples.len(), 3);
    }

    #[tokio::test]
    async fn test_offline_bridge_succeeds() {
        let result = execute(&BiomintConfig::default(), offline_args("near", "filecoin")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bridge_same_chain_fails() {
        let err = execute(&BiomintConfig::default(), offline_args("near", "near"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[tokio::test]
    async fn test_online_bridge_without_wallet_config_fails() {
        let mut args = offline_args("solana", "near");
        args.offline = false;

        let err = execute(&BiomintConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
