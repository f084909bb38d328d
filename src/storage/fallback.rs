//! In-memory fallback store.
//!
//! Used when no storage backend is configured. Identifiers are rolling-hash
//! locators marked `Synthetic`; contents live only as long as the process.

use super::cid::Cid;
use super::traits::*;
use crate::provenance::Provenance;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

pub const FALLBACK_URL_SCHEME: &str = "memory://fallback/";

#[derive(Clone, Default)]
pub struct FallbackStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl FallbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct payloads held.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for FallbackStore {
    async fn store(&self, bytes: &[u8]) -> StorageResult<StoredAsset> {
        let cid = {
            let mut blobs = self.blobs.write().await;
            let mut slot = 0;
            loop {
                let candidate = Cid::fallback_in_slot(bytes, slot);
                match blobs.get(candidate.as_str()) {
                    Some(existing) if existing.as_slice() == bytes => break candidate,
                    Some(_) => slot += 1,
                    None => {
                        blobs.insert(candidate.as_str().to_string(), bytes.to_vec());
                        break candidate;
                    }
                }
            }
        };
        let key = cid.as_str();

        warn!(
            cid = %cid,
            size = bytes.len(),
            "no storage backend configured; returning synthetic locator"
        );

        let url = format!("{}{}", FALLBACK_URL_SCHEME, key);
        Ok(StoredAsset::new(cid, url, bytes))
    }

    async fn retrieve(&self, cid: &Cid) -> StorageResult<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(cid.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                cid: cid.to_string(),
            })
    }

    fn provenance(&self) -> Provenance {
        Provenance::Synthetic
    }
}
