//! biomint configuration file handling
//!
//! Configuration is TOML. Every section is optional: a missing file, or a
//! file that only sets one chain, still yields a usable configuration.
//!
//! ## Credentials
//!
//! The storage token may be supplied through `BIOMINT_STORAGE_TOKEN` instead
//! of the file, and the IPFS API address through `BIOMINT_STORAGE_API_URL`.
//! Environment values override the file.

use crate::chain::Chain;
use crate::net::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the storage bearer token.
pub const STORAGE_TOKEN_ENV: &str = "BIOMINT_STORAGE_TOKEN";

/// Environment variable holding the IPFS HTTP API base URL.
pub const STORAGE_API_URL_ENV: &str = "BIOMINT_STORAGE_API_URL";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_GATEWAY_URL: &str = "https://ipfs.io";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiomintConfig {
    #[serde(default)]
    pub wallet: WalletConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-chain RPC endpoints and the accounts to open sessions for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Per-request timeout for RPC probes.
    #[serde(default = "default_wallet_timeout_secs")]
    pub timeout_secs: u64,

    /// Failed connects surface directly unless retries are configured here.
    #[serde(default = "RetryPolicy::none")]
    pub retry: RetryPolicy,

    pub near: Option<ChainEndpoint>,
    pub solana: Option<ChainEndpoint>,
    pub filecoin: Option<ChainEndpoint>,
    pub polkadot: Option<ChainEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEndpoint {
    /// JSON-RPC endpoint (HTTP or HTTPS).
    pub rpc_url: String,

    /// Account id, public key or address, in the chain's native format.
    pub account: String,

    /// Network label recorded on sessions (defaults per chain).
    pub network: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// IPFS HTTP API base URL. When unset, uploads use the synthetic fallback.
    pub api_url: Option<String>,

    /// Gateway used to build retrieval URLs.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Bearer token sent with API requests.
    pub token: Option<String>,

    #[serde(default = "default_storage_timeout_secs")]
    pub timeout_secs: u64,

    /// Permit the in-memory fallback when no API is configured.
    #[serde(default = "default_allow_fallback")]
    pub allow_fallback: bool,

    #[serde(default = "RetryPolicy::transient")]
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_wallet_timeout_secs() -> u64 {
    10
}

fn default_storage_timeout_secs() -> u64 {
    30
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_allow_fallback() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_wallet_timeout_secs(),
            retry: RetryPolicy::none(),
            near: None,
            solana: None,
            filecoin: None,
            polkadot: None,
        }
    }
}

impl WalletConfig {
    pub fn endpoint(&self, chain: Chain) -> Option<&ChainEndpoint> {
        match chain {
            Chain::Near => self.near.as_ref(),
            Chain::Solana => self.solana.as_ref(),
            Chain::Filecoin => self.filecoin.as_ref(),
            Chain::Polkadot => self.polkadot.as_ref(),
        }
    }

    pub fn set_endpoint(&mut self, chain: Chain, endpoint: ChainEndpoint) {
        let slot = match chain {
            Chain::Near => &mut self.near,
            Chain::Solana => &mut self.solana,
            Chain::Filecoin => &mut self.filecoin,
            Chain::Polkadot => &mut self.polkadot,
        };
        *slot = Some(endpoint);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            gateway_url: default_gateway_url(),
            token: None,
            timeout_secs: default_storage_timeout_secs(),
            allow_fallback: default_allow_fallback(),
            retry: RetryPolicy::transient(),
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BiomintConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        write_file(path, &contents)
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(STORAGE_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.storage.token = Some(token);
        }
        if let Some(url) = lookup(STORAGE_API_URL_ENV).filter(|v| !v.is_empty()) {
            self.storage.api_url = Some(url);
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# biomint configuration
#
# Sections are optional. Chains without an endpoint cannot be connected:
# `biomint connect <chain>` fails with a "not configured" error instead of
# inventing a session.

[wallet]
# Per-request RPC timeout in seconds
timeout_secs = 10

# Failed connects surface directly. Uncomment to retry transient failures.
# [wallet.retry]
# max_retries = 2
# base_delay_ms = 500
# max_delay_ms = 8000

# [wallet.near]
# rpc_url = "https://rpc.mainnet.near.org"
# account = "example.near"
# network = "mainnet"

# [wallet.solana]
# rpc_url = "https://api.mainnet-beta.solana.com"
# account = "<base58 public key>"

# [wallet.filecoin]
# rpc_url = "https://api.node.glif.io/rpc/v1"
# account = "f01234"

# [wallet.polkadot]
# rpc_url = "https://rpc.polkadot.io"
# account = "<SS58 address>"

[storage]
# IPFS HTTP API base URL. Leave unset to use the in-memory fallback, whose
# identifiers are marked synthetic and start with "fallback-".
# Can also be set with {api_env}.
# api_url = "http://127.0.0.1:5001"

# Gateway used to build retrieval URLs
gateway_url = "{gateway}"

# Bearer token for the API (prefer {token_env})
# token = "..."

timeout_secs = 30

# Set to false to refuse uploads when no API is configured
allow_fallback = true

[logging]
# Log level: trace, debug, info, warn, error
level = "{level}"
"#,
            api_env = STORAGE_API_URL_ENV,
            token_env = STORAGE_TOKEN_ENV,
            gateway = DEFAULT_GATEWAY_URL,
            level = DEFAULT_LOG_LEVEL,
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), ConfigError> {
        write_file(config_path, &Self::generate_default_toml())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Default config location: `<config_dir>/biomint/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("biomint")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn near_endpoint() -> ChainEndpoint {
        ChainEndpoint {
            rpc_url: "https://rpc.testnet.near.org".to_string(),
            account: "alice.testnet".to_string(),
            network: Some("testnet".to_string()),
        }
    }

    #[test]
    fn test_default_config() {
        let config = BiomintConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.wallet.timeout_secs, 10);
        assert_eq!(config.wallet.retry, RetryPolicy::none());
        assert_eq!(config.storage.retry.max_retries, 2);
        assert!(config.storage.api_url.is_none());
        assert!(config.storage.allow_fallback);
        for chain in Chain::ALL {
            assert!(config.wallet.endpoint(chain).is_none());
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = BiomintConfig::default();
        config.wallet.set_endpoint(Chain::Near, near_endpoint());
        config.storage.api_url = Some("http://127.0.0.1:5001".to_string());
        config.save(&config_path).unwrap();

        let loaded = BiomintConfig::load(&config_path).unwrap();
        assert_eq!(loaded.wallet.endpoint(Chain::Near), Some(&near_endpoint()));
        assert!(loaded.wallet.endpoint(Chain::Solana).is_none());
        assert_eq!(loaded.storage.api_url.as_deref(), Some("http://127.0.0.1:5001"));
    }

    #[test]
    fn test_create_default_config_is_loadable() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        BiomintConfig::create_default(&config_path).unwrap();
        assert!(config_path.exists());

        let config = BiomintConfig::load(&config_path).unwrap();
        assert_eq!(config.storage.gateway_url, DEFAULT_GATEWAY_URL);
        assert!(config.storage.api_url.is_none());
        assert!(config.wallet.near.is_none());
    }

    #[test]
    fn test_generate_default_toml_mentions_overrides() {
        let toml = BiomintConfig::generate_default_toml();
        assert!(toml.contains(STORAGE_TOKEN_ENV));
        assert!(toml.contains(STORAGE_API_URL_ENV));
        assert!(toml.contains("[wallet]"));
        assert!(toml.contains("allow_fallback = true"));
    }

    #[test]
    fn test_load_partial_config_applies_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let minimal = r#"
[wallet.solana]
rpc_url = "http://localhost:8899"
account = "11111111111111111111111111111111"
"#;
        fs::write(&config_path, minimal).unwrap();

        let config = BiomintConfig::load(&config_path).unwrap();
        let solana = config.wallet.endpoint(Chain::Solana).unwrap();
        assert_eq!(solana.rpc_url, "http://localhost:8899");
        assert!(solana.network.is_none());
        assert_eq!(config.wallet.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.retry, RetryPolicy::transient());
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        assert!(matches!(
            BiomintConfig::load(&path),
            Err(ConfigError::Read { .. })
        ));
        assert!(BiomintConfig::load_or_default(&path).is_ok());
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[wallet\ntimeout_secs = ").unwrap();

        let err = BiomintConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = BiomintConfig::default();
        config.storage.token = Some("from-file".to_string());

        config.apply_overrides(|key| match key {
            STORAGE_TOKEN_ENV => Some("from-env".to_string()),
            STORAGE_API_URL_ENV => Some("http://ipfs.local:5001".to_string()),
            _ => None,
        });

        assert_eq!(config.storage.token.as_deref(), Some("from-env"));
        assert_eq!(config.storage.api_url.as_deref(), Some("http://ipfs.local:5001"));
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let mut config = BiomintConfig::default();
        config.apply_overrides(|_| Some(String::new()));
        assert!(config.storage.token.is_none());
        assert!(config.storage.api_url.is_none());
    }
}
