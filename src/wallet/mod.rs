//! Wallet sessions.
//!
//! `connect(chain)` yields an `AccountHandle` or a `ConnectionError` naming
//! the chain. There is no implicit retry and no silent mock fallback.

pub mod account;
pub mod connector;
pub mod mock;
pub mod traits;

pub use account::validate_account;
pub use connector::RpcWalletConnector;
pub use mock::MockWalletConnector;
pub use traits::{AccountHandle, AccountState, ConnectionError, ConnectionResult, WalletConnector};
