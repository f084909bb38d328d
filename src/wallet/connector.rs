//! RPC-backed wallet connector.
//!
//! A session is established by validating the configured account id locally
//! and then reading the account from the chain's JSON-RPC node. Nothing is
//! signed; the handle proves the account exists where the operator says it
//! does.
//!
//! ## Probes
//!
//! | chain    | method(s)                                  | not found when                    |
//! |----------|--------------------------------------------|-----------------------------------|
//! | NEAR     | `query` (`view_account`, final)            | cause `UNKNOWN_ACCOUNT`           |
//! | Solana   | `getAccountInfo` (base64, finalized)       | `value` is `null`                 |
//! | Filecoin | `Filecoin.StateLookupID`                   | error mentions "actor not found"  |
//! | Polkadot | `system_chain`, `system_accountNextIndex`  | (never; unknown accounts have nonce 0) |

use super::account::validate_account;
use super::traits::*;
use crate::chain::Chain;
use crate::config::{ChainEndpoint, WalletConfig};
use crate::net::{JsonRpcClient, RpcError};
use crate::provenance::Provenance;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

pub struct RpcWalletConnector {
    config: WalletConfig,
}

impl RpcWalletConnector {
    pub fn new(config: WalletConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self, chain: Chain) -> ConnectionResult<&ChainEndpoint> {
        let endpoint = self
            .config
            .endpoint(chain)
            .ok_or_else(|| ConnectionError::NotConfigured {
                chain,
                reason: format!("no [wallet.{}] section in configuration", chain),
            })?;

        if endpoint.rpc_url.trim().is_empty() {
            return Err(ConnectionError::NotConfigured {
                chain,
                reason: "rpc_url is empty".to_string(),
            });
        }
        Ok(endpoint)
    }

    fn rpc_client(&self, chain: Chain, endpoint: &ChainEndpoint) -> ConnectionResult<JsonRpcClient> {
        JsonRpcClient::new(
            endpoint.rpc_url.clone(),
            self.config.timeout(),
            self.config.retry,
        )
        .map_err(|source| ConnectionError::Rpc {
            chain,
            endpoint: endpoint.rpc_url.clone(),
            source,
        })
    }
}

#[async_trait]
impl WalletConnector for RpcWalletConnector {
    async fn connect(&self, chain: Chain) -> ConnectionResult<AccountHandle> {
        let endpoint = self.endpoint(chain)?;

        validate_account(chain, &endpoint.account).map_err(|reason| {
            ConnectionError::InvalidAccount {
                chain,
                account: endpoint.account.clone(),
                reason,
            }
        })?;

        let client = self.rpc_client(chain, endpoint)?;
        let account = endpoint.account.as_str();

        let state = match chain {
            Chain::Near => probe_near(&client, account).await,
            Chain::Solana => probe_solana(&client, account).await,
            Chain::Filecoin => probe_filecoin(&client, account).await,
            Chain::Polkadot => probe_polkadot(&client, account).await,
        }
        .map_err(|failure| failure.into_error(chain, account, client.endpoint()))
        .inspect_err(|e| warn!(chain = %chain, error = %e, "wallet connect failed"))?;

        let network = endpoint
            .network
            .clone()
            .unwrap_or_else(|| chain.default_network().to_string());

        info!(chain = %chain, account, network = %network, "wallet session established");

        Ok(AccountHandle {
            chain,
            account_id: endpoint.account.clone(),
            network,
            endpoint: endpoint.rpc_url.clone(),
            connected_at: Utc::now(),
            state,
            provenance: Provenance::Live,
        })
    }
}

/// Why a probe failed, before the chain/endpoint context is attached.
enum ProbeFailure {
    NotFound,
    Rpc(RpcError),
}

impl ProbeFailure {
    fn into_error(self, chain: Chain, account: &str, endpoint: &str) -> ConnectionError {
        match self {
            Self::NotFound => ConnectionError::AccountNotFound {
                chain,
                account: account.to_string(),
                endpoint: endpoint.to_string(),
            },
            Self::Rpc(source) => ConnectionError::Rpc {
                chain,
                endpoint: endpoint.to_string(),
                source,
            },
        }
    }
}

impl From<RpcError> for ProbeFailure {
    fn from(err: RpcError) -> Self {
        Self::Rpc(err)
    }
}

type ProbeResult = Result<AccountState, ProbeFailure>;

#[derive(Deserialize)]
struct NearViewAccount {
    amount: String,
    block_height: u64,
}

async fn probe_near(client: &JsonRpcClient, account: &str) -> ProbeResult {
    let params = json!({
        "request_type": "view_account",
        "finality": "final",
        "account_id": account,
    });

    match client.call::<NearViewAccount>("query", params).await {
        Ok(view) => Ok(AccountState::Near {
            amount: view.amount,
            block_height: view.block_height,
        }),
        Err(RpcError::Remote { ref raw, .. }) if near_unknown_account(raw) => {
            Err(ProbeFailure::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

fn near_unknown_account(raw: &Value) -> bool {
    let cause = raw
        .get("cause")
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str);
    if cause == Some("UNKNOWN_ACCOUNT") {
        return true;
    }
    // Older nodes only report the condition in `data`.
    raw.get("data")
        .and_then(Value::as_str)
        .is_some_and(|d| d.contains("does not exist"))
}

#[derive(Deserialize)]
struct SolanaAccountInfo {
    value: Option<SolanaAccount>,
}

#[derive(Deserialize)]
struct SolanaAccount {
    lamports: u64,
    owner: String,
    executable: bool,
}

async fn probe_solana(client: &JsonRpcClient, account: &str) -> ProbeResult {
    let params = json!([account, {"encoding": "base64", "commitment": "finalized"}]);
    let info: SolanaAccountInfo = client.call("getAccountInfo", params).await?;

    match info.value {
        Some(acct) => Ok(AccountState::Solana {
            lamports: acct.lamports,
            owner: acct.owner,
            executable: acct.executable,
        }),
        None => Err(ProbeFailure::NotFound),
    }
}

async fn probe_filecoin(client: &JsonRpcClient, account: &str) -> ProbeResult {
    let params = json!([account, null]);

    match client.call::<String>("Filecoin.StateLookupID", params).await {
        Ok(actor_id) => Ok(AccountState::Filecoin { actor_id }),
        Err(RpcError::Remote { ref message, .. }) if message.contains("actor not found") => {
            Err(ProbeFailure::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}

async fn probe_polkadot(client: &JsonRpcClient, account: &str) -> ProbeResult {
    let chain_name: String = client.call("system_chain", json!([])).await?;
    let nonce: u64 = client
        .call("system_accountNextIndex", json!([account]))
        .await?;

    Ok(AccountState::Polkadot { chain_name, nonce })
}
