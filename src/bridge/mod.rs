//! Local cross-chain stream records.
//!
//! The bridge records intents only; it performs no proof verification,
//! finality tracking or replay protection.

pub mod client;
pub mod stream;

pub use client::{BatchReport, BridgeError, BridgeResult, MockBridgeClient};
pub use stream::{BridgeEvent, Stream, StreamId, StreamRequest, StreamStatus};
