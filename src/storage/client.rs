//! Storage façade that picks a backend from configuration.

use super::cid::Cid;
use super::fallback::FallbackStore;
use super::ipfs::IpfsHttpStore;
use super::traits::*;
use crate::config::StorageConfig;
use crate::provenance::Provenance;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ContentStorageClient {
    backend: Arc<dyn ContentStore>,
}

impl ContentStorageClient {
    /// Build the client for `config`.
    ///
    /// With `api_url` set the IPFS backend is used. Without it the in-memory
    /// fallback is used, unless `allow_fallback` is false.
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        match config.api_url.as_deref().map(str::trim) {
            Some(api_url) if !api_url.is_empty() => {
                info!(api_url, "using IPFS storage backend");
                Ok(Self::with_backend(Arc::new(IpfsHttpStore::new(api_url, config)?)))
            }
            _ if config.allow_fallback => {
                warn!("no storage api_url configured; stored content will be synthetic");
                Ok(Self::fallback())
            }
            _ => Err(StorageError::NotConfigured(
                "storage.api_url is unset and allow_fallback is false".to_string(),
            )),
        }
    }

    /// Client over the in-memory fallback store.
    pub fn fallback() -> Self {
        Self::with_backend(Arc::new(FallbackStore::new()))
    }

    pub fn with_backend(backend: Arc<dyn ContentStore>) -> Self {
        Self { backend }
    }

    pub fn is_fallback(&self) -> bool {
        self.backend.provenance().is_synthetic()
    }

    pub async fn store(&self, bytes: &[u8]) -> StorageResult<StoredAsset> {
        self.backend.store(bytes).await
    }

    pub async fn retrieve(&self, cid: &Cid) -> StorageResult<Vec<u8>> {
        self.backend.retrieve(cid).await
    }

    /// Serialize `value` as JSON and store it.
    pub async fn store_json<T: Serialize>(&self, value: &T) -> StorageResult<StoredAsset> {
        let bytes = serde_json::to_vec(value)?;
        self.store(&bytes).await
    }

    pub async fn retrieve_json<T: DeserializeOwned>(&self, cid: &Cid) -> StorageResult<T> {
        let bytes = self.retrieve(cid).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ContentStore for ContentStorageClient {
    async fn store(&self, bytes: &[u8]) -> StorageResult<StoredAsset> {
        self.backend.store(bytes).await
    }

    async fn retrieve(&self, cid: &Cid) -> StorageResult<Vec<u8>> {
        self.backend.retrieve(cid).await
    }

    fn provenance(&self) -> Provenance {
        self.backend.provenance()
    }
}
