//! Content storage trait abstractions.

use super::cid::Cid;
use crate::provenance::Provenance;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Locator for a stored payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub cid: Cid,
    pub url: String,
    pub size: u64,
    /// SHA-256 of the payload (hex), computed locally.
    pub digest: String,
    pub stored_at: DateTime<Utc>,
}

impl StoredAsset {
    pub fn new(cid: Cid, url: String, bytes: &[u8]) -> Self {
        Self {
            cid,
            url,
            size: bytes.len() as u64,
            digest: sha256_hex(bytes),
            stored_at: Utc::now(),
        }
    }

    pub fn provenance(&self) -> Provenance {
        self.cid.provenance()
    }

    pub fn is_synthetic(&self) -> bool {
        self.provenance().is_synthetic()
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("content not found: {cid}")]
    NotFound { cid: String },

    #[error("fallback identifier {cid} cannot be resolved by a content-addressed backend")]
    SyntheticCid { cid: String },

    #[error("storage backend is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response from storage backend: {0}")]
    InvalidResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Persists opaque payloads and returns locators for them.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn store(&self, bytes: &[u8]) -> StorageResult<StoredAsset>;

    async fn retrieve(&self, cid: &Cid) -> StorageResult<Vec<u8>>;

    /// Provenance of the identifiers this store hands out.
    fn provenance(&self) -> Provenance;
}
