//! biomint - multi-chain client toolkit
//!
//! Wallet sessions, content-addressed uploads, locally recorded bridge
//! streams and synthetic biometric samples.
//!
//! Key principles:
//! - Every returned record carries a `Provenance` (live or synthetic)
//! - Unconfigured backends fail loudly or fall back visibly, never silently
//! - Bridge streams are local records, not verified cross-chain transfers

pub mod biometric;
pub mod bridge;
pub mod chain;
pub mod config;
pub mod net;
pub mod provenance;
pub mod storage;
pub mod wallet;

pub use chain::Chain;
pub use provenance::Provenance;
