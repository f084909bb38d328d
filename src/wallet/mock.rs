//! Mock wallet connector for tests and offline runs.
//!
//! Every handle it returns is `Synthetic` with `AccountState::Unverified`.

use super::traits::*;
use crate::chain::Chain;
use crate::provenance::Provenance;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Endpoint recorded on mock sessions.
pub const MOCK_ENDPOINT: &str = "mock://wallet";

#[derive(Clone, Default)]
pub struct MockWalletConnector {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    accounts: HashMap<Chain, String>,
    failures: HashMap<Chain, String>,
    connects: Vec<Chain>,
}

impl MockWalletConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the account returned for `chain`.
    pub fn with_account(self, chain: Chain, account: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(chain, account.into());
        self
    }

    /// A connector with a placeholder account on every chain.
    pub fn with_all_chains() -> Self {
        Chain::ALL.into_iter().fold(Self::new(), |mock, chain| {
            mock.with_account(chain, format!("mock-{}-account", chain))
        })
    }

    /// Make the next and all later connects to `chain` fail with an RPC error.
    pub fn fail_chain(&self, chain: Chain, reason: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(chain, reason.into());
    }

    /// Chains passed to `connect`, in call order.
    pub fn connect_calls(&self) -> Vec<Chain> {
        self.state.lock().unwrap().connects.clone()
    }
}

#[async_trait]
impl WalletConnector for MockWalletConnector {
    async fn connect(&self, chain: Chain) -> ConnectionResult<AccountHandle> {
        let mut state = self.state.lock().unwrap();
        state.connects.push(chain);

        if let Some(reason) = state.failures.get(&chain) {
            return Err(ConnectionError::Rpc {
                chain,
                endpoint: MOCK_ENDPOINT.to_string(),
                source: crate::net::RpcError::Transport(reason.clone()),
            });
        }

        let account = state
            .accounts
            .get(&chain)
            .cloned()
            .ok_or_else(|| ConnectionError::NotConfigured {
                chain,
                reason: "no mock account registered".to_string(),
            })?;

        Ok(AccountHandle {
            chain,
            account_id: account,
            network: "mock".to_string(),
            endpoint: MOCK_ENDPOINT.to_string(),
            connected_at: Utc::now(),
            state: AccountState::Unverified,
            provenance: Provenance::Synthetic,
        })
    }
}
