//! Domain primitives: Policy, SelectionScope.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Allocation policy used to split capital across rounds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Policy {
    /// Identical capital committed to every round.
    #[default]
    #[serde(rename = "equal")]
    Equal,
    /// Geometrically weighted (martingale) capital per round.
    #[serde(rename = "martingale", alias = "weighted")]
    Weighted,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Equal => "equal",
            Policy::Weighted => "martingale",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(Policy::Equal),
            "martingale" | "weighted" => Ok(Policy::Weighted),
            other => Err(format!("unknown policy: {}", other)),
        }
    }
}

/// How executed-round selections are keyed across policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionScope {
    /// One set of round numbers shared by both policy tabs.
    #[default]
    Shared,
    /// An independent set per policy tab.
    PerPolicy,
}

impl FromStr for SelectionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(SelectionScope::Shared),
            "per_policy" => Ok(SelectionScope::PerPolicy),
            other => Err(format!("unknown selection scope: {}", other)),
        }
    }
}
