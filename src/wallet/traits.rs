//! Wallet connector trait abstractions.
//!
//! `RpcWalletConnector` proves sessions against real nodes;
//! `MockWalletConnector` replaces it in tests and offline runs.

use crate::chain::Chain;
use crate::net::RpcError;
use crate::provenance::Provenance;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account session on one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountHandle {
    pub chain: Chain,
    pub account_id: String,
    pub network: String,
    pub endpoint: String,
    pub connected_at: DateTime<Utc>,
    pub state: AccountState,
    pub provenance: Provenance,
}

impl AccountHandle {
    pub fn is_synthetic(&self) -> bool {
        self.provenance.is_synthetic()
    }
}

/// Account state observed while opening the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountState {
    Near {
        /// Balance in yoctoNEAR (decimal string, exceeds u64).
        amount: String,
        block_height: u64,
    },
    Solana {
        lamports: u64,
        owner: String,
        executable: bool,
    },
    Filecoin {
        actor_id: String,
    },
    Polkadot {
        chain_name: String,
        nonce: u64,
    },
    /// Nothing was observed; the session was not checked against a node.
    Unverified,
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("{chain} wallet is not configured: {reason}")]
    NotConfigured { chain: Chain, reason: String },

    #[error("invalid {chain} account id '{account}': {reason}")]
    InvalidAccount {
        chain: Chain,
        account: String,
        reason: String,
    },

    #[error("{chain} account '{account}' was not found at {endpoint}")]
    AccountNotFound {
        chain: Chain,
        account: String,
        endpoint: String,
    },

    #[error("{chain} RPC at {endpoint} failed: {source}")]
    Rpc {
        chain: Chain,
        endpoint: String,
        #[source]
        source: RpcError,
    },
}

impl ConnectionError {
    /// The chain the failure is attributed to.
    pub fn chain(&self) -> Chain {
        match self {
            Self::NotConfigured { chain, .. }
            | Self::InvalidAccount { chain, .. }
            | Self::AccountNotFound { chain, .. }
            | Self::Rpc { chain, .. } => *chain,
        }
    }
}

/// Opens an authenticated session for one chain.
///
/// A single failed call surfaces directly to the caller; implementations
/// never substitute a fabricated session for a failed one.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(&self, chain: Chain) -> ConnectionResult<AccountHandle>;
}
