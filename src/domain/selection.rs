//! Executed-round selection, shared across tabs or kept per policy.

use super::{Policy, SelectionScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Round numbers the user has marked as actually executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ExecutionSelection {
    Shared {
        rounds: BTreeSet<u32>,
    },
    PerPolicy {
        equal: BTreeSet<u32>,
        martingale: BTreeSet<u32>,
    },
}

impl ExecutionSelection {
    pub fn new(scope: SelectionScope) -> Self {
        match scope {
            SelectionScope::Shared => ExecutionSelection::Shared {
                rounds: BTreeSet::new(),
            },
            SelectionScope::PerPolicy => ExecutionSelection::PerPolicy {
                equal: BTreeSet::new(),
                martingale: BTreeSet::new(),
            },
        }
    }

    pub fn scope(&self) -> SelectionScope {
        match self {
            ExecutionSelection::Shared { .. } => SelectionScope::Shared,
            ExecutionSelection::PerPolicy { .. } => SelectionScope::PerPolicy,
        }
    }

    /// Executed rounds as seen from the given policy tab.
    pub fn rounds(&self, policy: Policy) -> &BTreeSet<u32> {
        match self {
            ExecutionSelection::Shared { rounds } => rounds,
            ExecutionSelection::PerPolicy { equal, martingale } => match policy {
                Policy::Equal => equal,
                Policy::Weighted => martingale,
            },
        }
    }

    fn rounds_mut(&mut self, policy: Policy) -> &mut BTreeSet<u32> {
        match self {
            ExecutionSelection::Shared { rounds } => rounds,
            ExecutionSelection::PerPolicy { equal, martingale } => match policy {
                Policy::Equal => equal,
                Policy::Weighted => martingale,
            },
        }
    }

    /// Flip a round's executed flag. Returns the new state.
    pub fn toggle(&mut self, policy: Policy, round: u32) -> bool {
        let rounds = self.rounds_mut(policy);
        if rounds.remove(&round) {
            false
        } else {
            rounds.insert(round);
            true
        }
    }

    pub fn clear(&mut self) {
        match self {
            ExecutionSelection::Shared { rounds } => rounds.clear(),
            ExecutionSelection::PerPolicy { equal, martingale } => {
                equal.clear();
                martingale.clear();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ExecutionSelection::Shared { rounds } => rounds.is_empty(),
            ExecutionSelection::PerPolicy { equal, martingale } => {
                equal.is_empty() && martingale.is_empty()
            }
        }
    }
}

impl Default for ExecutionSelection {
    fn default() -> Self {
        Self::new(SelectionScope::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_selection_spans_tabs() {
        let mut selection = ExecutionSelection::new(SelectionScope::Shared);
        assert!(selection.toggle(Policy::Equal, 2));
        assert!(selection.rounds(Policy::Weighted).contains(&2));
    }

    #[test]
    fn test_per_policy_selection_is_independent() {
        let mut selection = ExecutionSelection::new(SelectionScope::PerPolicy);
        selection.toggle(Policy::Equal, 2);
        assert!(selection.rounds(Policy::Equal).contains(&2));
        assert!(selection.rounds(Policy::Weighted).is_empty());
    }

    #[test]
    fn test_toggle_twice_unmarks() {
        let mut selection = ExecutionSelection::default();
        assert!(selection.toggle(Policy::Equal, 1));
        assert!(!selection.toggle(Policy::Equal, 1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_clear_keeps_scope() {
        let mut selection = ExecutionSelection::new(SelectionScope::PerPolicy);
        selection.toggle(Policy::Weighted, 3);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.scope(), SelectionScope::PerPolicy);
    }

    #[test]
    fn test_serialization_is_tagged_by_scope() {
        let mut selection = ExecutionSelection::new(SelectionScope::Shared);
        selection.toggle(Policy::Equal, 1);
        selection.toggle(Policy::Equal, 3);
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["scope"], "shared");
        assert_eq!(json["rounds"], serde_json::json!([1, 3]));

        let back: ExecutionSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, selection);
    }
}
