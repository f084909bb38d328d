//! Content identifiers.
//!
//! ## Fallback CIDs
//!
//! When no storage backend is configured the locator is derived locally from
//! a 32-bit rolling hash:
//!
//! ```text
//! h = 0; for each byte b: h = h * 31 + b  (wrapping)
//! fallback-<h as 8 hex digits>-<payload length in hex>[-<slot>]
//! ```
//!
//! The hash is not cryptographic and collides easily. A second payload that
//! lands on an occupied locator gets the next free `-<slot>` suffix
//! (`-1`, `-2`, ...). The locator is kept distinct from
//! real identifiers both in the type (`Cid::Fallback`) and in its text, which
//! never starts with a CIDv0 (`Qm`) or CIDv1 multibase prefix.

use crate::provenance::Provenance;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FALLBACK_PREFIX: &str = "fallback-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cid {
    /// Identifier returned by a content-addressed backend.
    Content(String),
    /// Locally derived rolling-hash locator.
    Fallback(String),
}

impl Cid {
    /// Build the fallback locator for `bytes`.
    pub fn fallback_for(bytes: &[u8]) -> Self {
        Self::fallback_in_slot(bytes, 0)
    }

    /// Fallback locator for `bytes` in collision slot `slot`; slot 0 has no suffix.
    pub fn fallback_in_slot(bytes: &[u8], slot: usize) -> Self {
        let base = format!(
            "{}{:08x}-{:x}",
            FALLBACK_PREFIX,
            rolling_hash(bytes),
            bytes.len()
        );
        match slot {
            0 => Self::Fallback(base),
            n => Self::Fallback(format!("{}-{}", base, n)),
        }
    }

    /// Classify a textual identifier.
    ///
    /// Anything carrying the fallback prefix is a fallback locator; every
    /// other non-empty string is treated as a backend identifier.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            None
        } else if s.starts_with(FALLBACK_PREFIX) {
            Some(Self::Fallback(s.to_string()))
        } else {
            Some(Self::Content(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Content(s) | Self::Fallback(s) => s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            Self::Content(_) => Provenance::Live,
            Self::Fallback(_) => Provenance::Synthetic,
        }
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 32-bit rolling hash (`h * 31 + b`, wrapping).
pub fn rolling_hash(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_hash_known_values() {
        assert_eq!(rolling_hash(b""), 0);
        assert_eq!(rolling_hash(b"a"), 97);
        // 97 * 31 + 98
        assert_eq!(rolling_hash(b"ab"), 3105);
    }

    #[test]
    fn test_fallback_cid_format() {
        let cid = Cid::fallback_for(b"ab");
        assert_eq!(cid.as_str(), "fallback-00000c21-2");
        assert!(cid.is_fallback());
        assert_eq!(cid.provenance(), Provenance::Synthetic);

        assert_eq!(Cid::fallback_in_slot(b"ab", 0), cid);
        assert_eq!(Cid::fallback_in_slot(b"ab", 2).as_str(), "fallback-00000c21-2-2");
    }

    #[test]
    fn test_fallback_cid_never_looks_like_real_cid() {
        for payload in [&b""[..], b"hello", b"{\"emotion\":\"calm\"}"] {
            let cid = Cid::fallback_for(payload);
            let text = cid.as_str();
            assert!(!text.starts_with("Qm"));
            assert!(!text.starts_with("bafy"));
            assert!(!text.starts_with("bafk"));
        }
    }

    #[test]
    fn test_parse_classifies_identifiers() {
        let real = Cid::parse("bafkreigh2akiscaildcqabsyg3dfr6chu3fgpregiymsck7e7aqa4s52zy").unwrap();
        assert_eq!(real.provenance(), Provenance::Live);

        let fallback = Cid::parse("fallback-00000c21-2").unwrap();
        assert_eq!(fallback, Cid::fallback_for(b"ab"));

        assert!(Cid::parse("   ").is_none());
    }

    #[test]
    fn test_serialization_keeps_kind() {
        let json = serde_json::to_value(Cid::fallback_for(b"x")).unwrap();
        assert_eq!(json["kind"], "fallback");

        let json = serde_json::to_value(Cid::Content("QmTest".into())).unwrap();
        assert_eq!(json["kind"], "content");
        assert_eq!(json["value"], "QmTest");
    }
}
