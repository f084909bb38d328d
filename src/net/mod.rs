//! Network plumbing shared by the wallet and storage clients.

pub mod jsonrpc;
pub mod retry;

pub use jsonrpc::{JsonRpcClient, RpcError};
pub use retry::{retry_with_backoff, RetryPolicy};
