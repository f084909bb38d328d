//! Content-addressed storage.
//!
//! `store(bytes)` returns a `StoredAsset`; `retrieve(cid)` returns the bytes
//! or `StorageError::NotFound`. Whether an identifier came from a real backend
//! or from the local fallback is carried by `Cid` itself.

pub mod cid;
pub mod client;
pub mod fallback;
pub mod ipfs;
pub mod traits;

pub use cid::{rolling_hash, Cid, FALLBACK_PREFIX};
pub use client::ContentStorageClient;
pub use fallback::FallbackStore;
pub use ipfs::IpfsHttpStore;
pub use traits::{sha256_hex, ContentStore, StorageError, StorageResult, StoredAsset};
