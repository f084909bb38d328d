//! Stream records.
//!
//! A stream is a locally recorded intent to move content from one chain to
//! another. It is never acknowledged by the target chain, so no status claims
//! delivery.

use crate::chain::Chain;
use crate::provenance::Provenance;
use crate::storage::Cid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

const STREAM_ID_PREFIX: &str = "stream-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    pub fn generate() -> Self {
        Self(format!("{}{}", STREAM_ID_PREFIX, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    /// Held in the local registry only.
    Recorded,
    /// Closed locally; no further activity is expected.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    /// Position in creation order within this process.
    pub sequence: u64,
    pub source_chain: Chain,
    pub target_chain: Chain,
    /// Account that opened the stream on the source chain.
    pub creator: String,
    pub content_cid: Cid,
    pub content_url: String,
    /// SHA-256 of the payload (hex).
    pub payload_digest: String,
    pub metadata: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub status: StreamStatus,
    pub provenance: Provenance,
}

impl Stream {
    pub fn is_active(&self) -> bool {
        self.status == StreamStatus::Recorded
    }
}

/// Input for `MockBridgeClient::submit`.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub source: Chain,
    pub target: Chain,
    pub payload: Vec<u8>,
    pub metadata: BTreeMap<String, String>,
}

impl StreamRequest {
    pub fn new(source: Chain, target: Chain, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            source,
            target,
            payload: payload.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Notifications published by the bridge client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    StreamCreated {
        id: StreamId,
        source_chain: Chain,
        target_chain: Chain,
        content_cid: Cid,
        provenance: Provenance,
    },
    StreamClosed {
        id: StreamId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_id_format() {
        let id = StreamId::generate();
        assert!(id.as_str().starts_with(STREAM_ID_PREFIX));
        assert!(Uuid::parse_str(&id.as_str()[STREAM_ID_PREFIX.len()..]).is_ok());
    }

    #[test]
    fn test_request_builder() {
        let request = StreamRequest::new(Chain::Near, Chain::Filecoin, b"x".to_vec())
            .with_metadata("kind", "emotion")
            .with_metadata("version", "1");
        assert_eq!(request.metadata.len(), 2);
        assert_eq!(request.metadata["kind"], "emotion");
    }

    #[test]
    fn test_event_serialization() {
        let event = BridgeEvent::StreamClosed {
            id: StreamId::from("stream-1"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "stream_closed");
        assert_eq!(json["id"], "stream-1");
    }
}
