//! Per-round schedule types produced by the allocation engine.

use super::Policy;
use serde::{Deserialize, Serialize};

/// One purchase round of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based sequence index.
    pub round: u32,
    pub entry_price: f64,
    pub entry_amount: f64,
    pub quantity: f64,
    pub cumulative_entry_amount: f64,
    pub cumulative_quantity: f64,
    /// Cost basis so far: cumulative amount over cumulative quantity.
    pub average_price: f64,
}

/// Summary of a schedule, either terminal or over executed rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_average_price: f64,
    pub total_entry_amount: f64,
    pub total_held_quantity: f64,
}

/// Ordered rounds plus their full-schedule summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<Round>,
    pub summary: Summary,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `round` is a valid index into this schedule.
    pub fn contains_round(&self, round: u32) -> bool {
        round >= 1 && (round as usize) <= self.rows.len()
    }
}

/// The two schedules of one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedules {
    pub equal: Schedule,
    #[serde(rename = "martingale", alias = "weighted")]
    pub weighted: Schedule,
}

impl Schedules {
    pub fn get(&self, policy: Policy) -> &Schedule {
        match policy {
            Policy::Equal => &self.equal,
            Policy::Weighted => &self.weighted,
        }
    }
}
