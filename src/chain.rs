//! Supported chains.
//!
//! Each chain carries the numeric registry code used by the bridge contracts
//! to address it (Polkadot uses its SLIP-44 coin type).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A blockchain this crate can open sessions against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Near,
    Solana,
    Filecoin,
    Polkadot,
}

impl Chain {
    /// Every supported chain, in registry order.
    pub const ALL: [Chain; 4] = [Chain::Near, Chain::Solana, Chain::Filecoin, Chain::Polkadot];

    /// Lowercase chain name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Near => "near",
            Self::Solana => "solana",
            Self::Filecoin => "filecoin",
            Self::Polkadot => "polkadot",
        }
    }

    /// Numeric network code used in cross-chain records.
    pub fn registry_code(&self) -> u32 {
        match self {
            Self::Near => 397,
            Self::Solana => 501,
            Self::Filecoin => 314,
            Self::Polkadot => 354,
        }
    }

    /// Network label assumed when the operator does not name one.
    pub fn default_network(&self) -> &'static str {
        match self {
            Self::Near | Self::Solana | Self::Filecoin => "mainnet",
            Self::Polkadot => "polkadot",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a chain name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chain '{0}' (expected one of: near, solana, filecoin, polkadot)")]
pub struct UnknownChain(pub String);

impl FromStr for Chain {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Chain::ALL
            .into_iter()
            .find(|chain| chain.name() == lowered)
            .ok_or_else(|| UnknownChain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("NEAR".parse::<Chain>().unwrap(), Chain::Near);
        assert_eq!(" Solana ".parse::<Chain>().unwrap(), Chain::Solana);
        assert_eq!("filecoin".parse::<Chain>().unwrap(), Chain::Filecoin);
    }

    #[test]
    fn test_parse_unknown_chain() {
        let err = "ethereum".parse::<Chain>().unwrap_err();
        assert_eq!(err, UnknownChain("ethereum".to_string()));
        assert!(err.to_string().contains("ethereum"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for chain in Chain::ALL {
            assert_eq!(chain.to_string().parse::<Chain>().unwrap(), chain);
        }
    }

    #[test]
    fn test_registry_codes_are_distinct() {
        let mut codes: Vec<_> = Chain::ALL.iter().map(|c| c.registry_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Chain::ALL.len());
        assert_eq!(Chain::Filecoin.registry_code(), 314);
        assert_eq!(Chain::Near.registry_code(), 397);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Chain::Polkadot).unwrap(), "\"polkadot\"");
        let chain: Chain = serde_json::from_str("\"near\"").unwrap();
        assert_eq!(chain, Chain::Near);
    }
}
