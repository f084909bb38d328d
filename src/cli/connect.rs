use super::output::{print_json, warn_if_synthetic};
use biomint::config::BiomintConfig;
use biomint::wallet::{RpcWalletConnector, WalletConnector};
use biomint::Chain;

/// Open a session for `chain` and print the handle.
pub async fn execute(config: &BiomintConfig, chain: &str) -> Result<(), Box<dyn std::error::Error>> {
    let chain: Chain = chain.parse()?;
    let connector = RpcWalletConnector::new(config.wallet.clone());

    let handle = connector.connect(chain).await?;
    warn_if_synthetic(handle.provenance, "wallet session");
    print_json(&handle)
}
