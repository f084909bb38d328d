//! Provenance marking for returned records.
//!
//! A `Synthetic` value was fabricated locally (fallback hash, mock session,
//! generated sample) and must never be presented as chain or storage state.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by a real backend call.
    Live,
    /// Fabricated locally.
    Synthetic,
}

impl Provenance {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic)
    }

    /// A value built from two inputs is only live if both are.
    pub fn combine(self, other: Provenance) -> Provenance {
        if self.is_synthetic() || other.is_synthetic() {
            Self::Synthetic
        } else {
            Self::Live
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}
