use crate::domain::{Schedule, Summary};
use std::collections::BTreeSet;

/// Summarize a schedule over the executed rounds only.
///
/// Sums per-round amounts and quantities (never the cumulative fields, since
/// the selection may be non-contiguous). With no matching rounds the
/// full-schedule summary is returned unchanged.
pub fn aggregate(schedule: &Schedule, executed: &BTreeSet<u32>) -> Summary {
    let mut matched = 0usize;
    let mut total_entry_amount = 0.0;
    let mut total_held_quantity = 0.0;

    for row in schedule.rows.iter().filter(|r| executed.contains(&r.round)) {
        matched += 1;
        total_entry_amount += row.entry_amount;
        total_held_quantity += row.quantity;
    }

    if matched == 0 {
        return schedule.summary;
    }

    let final_average_price = if total_held_quantity > 0.0 {
        total_entry_amount / total_held_quantity
    } else {
        0.0
    };

    Summary {
        final_average_price,
        total_entry_amount,
        total_held_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Round;

    fn row(round: u32, entry_amount: f64, quantity: f64) -> Round {
        Round {
            round,
            entry_price: if quantity > 0.0 { entry_amount / quantity } else { 0.0 },
            entry_amount,
            quantity,
            cumulative_entry_amount: 0.0,
            cumulative_quantity: 0.0,
            average_price: 0.0,
        }
    }

    fn schedule(rows: Vec<Round>) -> Schedule {
        Schedule {
            rows,
            summary: Summary {
                final_average_price: 1.0,
                total_entry_amount: 2.0,
                total_held_quantity: 3.0,
            },
        }
    }

    #[test]
    fn test_empty_selection_returns_full_summary() {
        let s = schedule(vec![row(1, 10.0, 1.0), row(2, 10.0, 2.0)]);
        assert_eq!(aggregate(&s, &BTreeSet::new()), s.summary);
    }

    #[test]
    fn test_selection_outside_schedule_returns_full_summary() {
        let s = schedule(vec![row(1, 10.0, 1.0)]);
        let executed: BTreeSet<u32> = [5, 9].into_iter().collect();
        assert_eq!(aggregate(&s, &executed), s.summary);
    }

    #[test]
    fn test_non_contiguous_selection_sums_per_round_values() {
        let s = schedule(vec![row(1, 10.0, 1.0), row(2, 20.0, 4.0), row(3, 30.0, 5.0)]);
        let executed: BTreeSet<u32> = [1, 3].into_iter().collect();
        let summary = aggregate(&s, &executed);
        assert_eq!(summary.total_entry_amount, 40.0);
        assert_eq!(summary.total_held_quantity, 6.0);
        assert!((summary.final_average_price - 40.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_quantity_yields_zero_average() {
        let s = schedule(vec![row(1, 10.0, 0.0)]);
        let executed: BTreeSet<u32> = [1].into_iter().collect();
        let summary = aggregate(&s, &executed);
        assert_eq!(summary.final_average_price, 0.0);
        assert_eq!(summary.total_entry_amount, 10.0);
    }
}
