//! Store keys for persisted session state.

pub const ITEM_NAME: &str = "itemName";
pub const CURRENT_PRICE: &str = "currentPrice";
pub const TOTAL_CAPITAL: &str = "totalCapital";
pub const SPLIT_COUNT: &str = "splitCount";
pub const DROP_RATE: &str = "dropRate";
pub const MARTINGALE_MULTIPLIER: &str = "martingaleMultiplier";
pub const ACTIVE_TAB: &str = "activeTab";
pub const RESULTS: &str = "results";
pub const EXECUTED_ROWS: &str = "executedRows";

pub const ALL: [&str; 9] = [
    ITEM_NAME,
    CURRENT_PRICE,
    TOTAL_CAPITAL,
    SPLIT_COUNT,
    DROP_RATE,
    MARTINGALE_MULTIPLIER,
    ACTIVE_TAB,
    RESULTS,
    EXECUTED_ROWS,
];

/// Prefixed key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn all(&self) -> impl Iterator<Item = String> + '_ {
        ALL.iter().map(move |name| self.key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_keys() {
        let keys = StorageKeys::new("split_");
        assert_eq!(keys.key(RESULTS), "split_results");
        assert_eq!(keys.all().count(), 9);
        assert!(keys.all().any(|k| k == "split_martingaleMultiplier"));
    }
}
