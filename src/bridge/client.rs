//! Local bridge client.
//!
//! `create_stream` opens a session on the source chain, stores the payload,
//! and records the stream in an in-memory registry. Nothing is sent to the
//! target chain: there is no acknowledgment, finality check or rollback, and
//! "success" means only that the local record exists.

use super::stream::*;
use crate::chain::Chain;
use crate::storage::{ContentStore, StorageError};
use crate::wallet::{ConnectionError, WalletConnector};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

/// Events buffered per subscriber before the slowest one starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 256;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("source and target chain must differ (both are {0})")]
    SameChain(Chain),

    #[error("payload is empty")]
    EmptyPayload,

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("stream not found: {0}")]
    StreamNotFound(StreamId),

    #[error("stream already closed: {0}")]
    StreamClosed(StreamId),

    #[error("wallet connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("payload storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of a batch submission.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: Vec<StreamId>,
    /// `(request index, error)` for every request that failed.
    pub failures: Vec<(usize, BridgeError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Default)]
struct Registry {
    streams: HashMap<StreamId, Stream>,
    order: Vec<StreamId>,
}

pub struct MockBridgeClient {
    wallets: Arc<dyn WalletConnector>,
    storage: Arc<dyn ContentStore>,
    registry: RwLock<Registry>,
    events: broadcast::Sender<BridgeEvent>,
}

impl MockBridgeClient {
    pub fn new(wallets: Arc<dyn WalletConnector>, storage: Arc<dyn ContentStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            wallets,
            storage,
            registry: RwLock::new(Registry::default()),
            events,
        }
    }

    /// Record a stream carrying `payload` from `source` to `target`.
    pub async fn create_stream(
        &self,
        source: Chain,
        target: Chain,
        payload: &[u8],
    ) -> BridgeResult<StreamId> {
        self.submit(StreamRequest::new(source, target, payload)).await
    }

    /// Record a stream described by `request`.
    pub async fn submit(&self, request: StreamRequest) -> BridgeResult<StreamId> {
        validate(&request)?;

        let session = self.wallets.connect(request.source).await?;
        let asset = self.storage.store(&request.payload).await?;
        let provenance = session.provenance.combine(asset.provenance());

        let mut registry = self.registry.write().await;

        let mut id = StreamId::generate();
        while registry.streams.contains_key(&id) {
            id = StreamId::generate();
        }

        let stream = Stream {
            id: id.clone(),
            sequence: registry.order.len() as u64,
            source_chain: request.source,
            target_chain: request.target,
            creator: session.account_id,
            content_cid: asset.cid.clone(),
            content_url: asset.url,
            payload_digest: asset.digest,
            metadata: request.metadata,
            created_at: Utc::now(),
            status: StreamStatus::Recorded,
            provenance,
        };

        registry.order.push(id.clone());
        registry.streams.insert(id.clone(), stream);
        drop(registry);

        if provenance.is_synthetic() {
            warn!(
                stream = %id,
                source = %request.source,
                target = %request.target,
                cid = %asset.cid,
                "stream recorded with synthetic session or content"
            );
        } else {
            info!(
                stream = %id,
                source = %request.source,
                target = %request.target,
                cid = %asset.cid,
                "stream recorded"
            );
        }

        // No subscribers is fine.
        let _ = self.events.send(BridgeEvent::StreamCreated {
            id: id.clone(),
            source_chain: request.source,
            target_chain: request.target,
            content_cid: asset.cid,
            provenance,
        });

        Ok(id)
    }

    /// Submit each request in order. A failure is recorded and the loop moves on.
    pub async fn create_streams(&self, requests: Vec<StreamRequest>) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, request) in requests.into_iter().enumerate() {
            match self.submit(request).await {
                Ok(id) => report.created.push(id),
                Err(e) => {
                    warn!(index, error = %e, "batch stream failed");
                    report.failures.push((index, e));
                }
            }
        }

        report
    }

    pub async fn get_stream(&self, id: &StreamId) -> Option<Stream> {
        self.registry.read().await.streams.get(id).cloned()
    }

    pub async fn close_stream(&self, id: &StreamId) -> BridgeResult<()> {
        let mut registry = self.registry.write().await;
        let stream = registry
            .streams
            .get_mut(id)
            .ok_or_else(|| BridgeError::StreamNotFound(id.clone()))?;

        if stream.status == StreamStatus::Closed {
            return Err(BridgeError::StreamClosed(id.clone()));
        }
        stream.status = StreamStatus::Closed;
        drop(registry);

        info!(stream = %id, "stream closed");
        let _ = self.events.send(BridgeEvent::StreamClosed { id: id.clone() });
        Ok(())
    }

    pub async fn active_stream_count(&self) -> usize {
        self.registry
            .read()
            .await
            .streams
            .values()
            .filter(|s| s.is_active())
            .count()
    }

    /// Stream ids in creation order, starting at `from_index`.
    pub async fn stream_ids(&self, from_index: usize, limit: usize) -> Vec<StreamId> {
        self.registry
            .read()
            .await
            .order
            .iter()
            .skip(from_index)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Subscribe to events published after this call.
    ///
    /// A subscriber that falls more than the channel capacity behind skips
    /// the events it missed.
    pub fn subscribe(&self) -> Box<dyn futures::Stream<Item = BridgeEvent> + Send + Unpin> {
        let stream = BroadcastStream::new(self.events.subscribe()).filter_map(|event| event.ok());
        Box::new(Box::pin(stream))
    }
}

fn validate(request: &StreamRequest) -> BridgeResult<()> {
    if request.source == request.target {
        return Err(BridgeError::SameChain(request.source));
    }
    if request.payload.is_empty() {
        return Err(BridgeError::EmptyPayload);
    }
    validate_metadata(&request.metadata)
}

fn validate_metadata(metadata: &BTreeMap<String, String>) -> BridgeResult<()> {
    if metadata.keys().any(|k| k.trim().is_empty()) {
        return Err(BridgeError::InvalidMetadata(
            "metadata keys must be non-empty".to_string(),
        ));
    }
    Ok(())
}
