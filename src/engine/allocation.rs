use crate::domain::{InvalidInputError, Round, Schedule, Schedules, SplitParams, Summary};

/// Assumed price at `round` (1-based): a compounding drop off the original
/// price, never off the previous round's price.
pub fn entry_price(price: f64, drop_rate_percent: f64, round: u32) -> f64 {
    price * (1.0 - drop_rate_percent / 100.0).powf(f64::from(round - 1))
}

/// Closed-form sum of `multiplier^(i-1)` for `i` in `1..=count`.
pub fn sum_of_weights(multiplier: f64, count: u32) -> f64 {
    if multiplier == 1.0 {
        f64::from(count)
    } else {
        (multiplier.powf(f64::from(count)) - 1.0) / (multiplier - 1.0)
    }
}

/// Compute both schedules for validated inputs.
pub fn compute(params: &SplitParams) -> Schedules {
    let amount_per_split = params.capital() / f64::from(params.count());
    let equal = build_schedule(params, |_| amount_per_split);

    let multiplier = params.multiplier();
    let base_amount = params.capital() / sum_of_weights(multiplier, params.count());
    let weighted = build_schedule(params, |round| {
        base_amount * multiplier.powf(f64::from(round - 1))
    });

    Schedules { equal, weighted }
}

/// Validate raw inputs and compute both schedules.
///
/// # Errors
/// Returns `InvalidInputError` before any round is computed if an input is
/// non-finite or not strictly positive.
pub fn try_compute(
    price: f64,
    capital: f64,
    count: u32,
    drop_rate_percent: f64,
    multiplier: f64,
) -> Result<Schedules, InvalidInputError> {
    let params = SplitParams::new(price, capital, count, drop_rate_percent, multiplier)?;
    Ok(compute(&params))
}

fn build_schedule(params: &SplitParams, amount_for_round: impl Fn(u32) -> f64) -> Schedule {
    let mut rows = Vec::with_capacity(params.count() as usize);
    let mut cumulative_entry_amount = 0.0;
    let mut cumulative_quantity = 0.0;

    for round in 1..=params.count() {
        let entry_price = entry_price(params.price(), params.drop_rate_percent(), round);
        let entry_amount = amount_for_round(round);
        let quantity = entry_amount / entry_price;

        cumulative_entry_amount += entry_amount;
        cumulative_quantity += quantity;

        rows.push(Round {
            round,
            entry_price,
            entry_amount,
            quantity,
            cumulative_entry_amount,
            cumulative_quantity,
            // Recomputed from the running sums each round, never blended.
            average_price: cumulative_entry_amount / cumulative_quantity,
        });
    }

    let summary = match rows.last() {
        Some(last) => Summary {
            final_average_price: last.average_price,
            total_entry_amount: params.capital(),
            total_held_quantity: last.cumulative_quantity,
        },
        None => Summary::default(),
    };

    Schedule { rows, summary }
}
