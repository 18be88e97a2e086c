//! Calculation inputs: the raw editable form and its validated counterpart.

use super::format::parse_formatted_number;
use crate::engine::{entry_price, sum_of_weights};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input field names, as the presentation layer and the store know them.
pub mod fields {
    pub const CURRENT_PRICE: &str = "currentPrice";
    pub const TOTAL_CAPITAL: &str = "totalCapital";
    pub const SPLIT_COUNT: &str = "splitCount";
    pub const DROP_RATE: &str = "dropRate";
    pub const MARTINGALE_MULTIPLIER: &str = "martingaleMultiplier";
}

/// Rejection of a calculation request. Raised before any round is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },
    #[error("{field} must be greater than 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be a whole number, got {value:?}")]
    NotInteger { field: &'static str, value: String },
    #[error("dropRate must be below 100 percent, got {0}")]
    DropRateTooLarge(f64),
    #[error("splitCount of {count} exceeds the maximum of {max}")]
    TooManyRounds { count: u64, max: u32 },
    #[error("{0} produces values outside the representable range for this splitCount")]
    Unrepresentable(&'static str),
    #[error("inputs produce a per-round quantity outside the representable range")]
    QuantityOutOfRange,
}

/// Validated scalar inputs for one calculation run.
///
/// Every field is finite and strictly positive, `count >= 1`, and the
/// projected price path and weights stay representable for every round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitParams {
    price: f64,
    capital: f64,
    count: u32,
    drop_rate_percent: f64,
    multiplier: f64,
}

impl SplitParams {
    /// Validate the five inputs.
    ///
    /// # Errors
    /// Returns an error if any value is non-finite or `<= 0`, if the drop rate
    /// reaches 100%, or if some round's price, amount or quantity is not a
    /// finite positive `f64`.
    pub fn new(
        price: f64,
        capital: f64,
        count: u32,
        drop_rate_percent: f64,
        multiplier: f64,
    ) -> Result<Self, InvalidInputError> {
        let price = require_positive(fields::CURRENT_PRICE, price)?;
        let capital = require_positive(fields::TOTAL_CAPITAL, capital)?;
        if count == 0 {
            return Err(InvalidInputError::NotPositive {
                field: fields::SPLIT_COUNT,
                value: 0.0,
            });
        }
        let drop_rate_percent = require_positive(fields::DROP_RATE, drop_rate_percent)?;
        let multiplier = require_positive(fields::MARTINGALE_MULTIPLIER, multiplier)?;

        if drop_rate_percent >= 100.0 {
            return Err(InvalidInputError::DropRateTooLarge(drop_rate_percent));
        }

        ensure_representable(price, capital, count, drop_rate_percent, multiplier)?;

        Ok(Self {
            price,
            capital,
            count,
            drop_rate_percent,
            multiplier,
        })
    }

    /// Validate inputs where the round count arrives as a JSON number.
    ///
    /// # Errors
    /// Same as [`SplitParams::new`], plus `NotInteger` for fractional counts.
    pub fn from_numbers(
        price: f64,
        capital: f64,
        count: f64,
        drop_rate_percent: f64,
        multiplier: f64,
    ) -> Result<Self, InvalidInputError> {
        let count = require_positive(fields::SPLIT_COUNT, count)?;
        if count.fract() != 0.0 {
            return Err(InvalidInputError::NotInteger {
                field: fields::SPLIT_COUNT,
                value: count.to_string(),
            });
        }
        if count > f64::from(u32::MAX) {
            return Err(InvalidInputError::TooManyRounds {
                count: count as u64,
                max: u32::MAX,
            });
        }
        Self::new(price, capital, count as u32, drop_rate_percent, multiplier)
    }

    /// Reject counts above the configured ceiling.
    pub fn ensure_count_within(self, max: u32) -> Result<Self, InvalidInputError> {
        if self.count > max {
            return Err(InvalidInputError::TooManyRounds {
                count: u64::from(self.count),
                max,
            });
        }
        Ok(self)
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn drop_rate_percent(&self) -> f64 {
        self.drop_rate_percent
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

/// Per-round quantity is `amount / price`. Under both policies it changes by a
/// constant ratio each round, so its extremes sit at the first and last round.
fn ensure_representable(
    price: f64,
    capital: f64,
    count: u32,
    drop_rate_percent: f64,
    multiplier: f64,
) -> Result<(), InvalidInputError> {
    let last_price = entry_price(price, drop_rate_percent, count);
    if !is_finite_positive(last_price) {
        return Err(InvalidInputError::Unrepresentable(fields::DROP_RATE));
    }

    let equal_amount = capital / f64::from(count);
    if !is_finite_positive(equal_amount) {
        return Err(InvalidInputError::Unrepresentable(fields::TOTAL_CAPITAL));
    }

    let weights = sum_of_weights(multiplier, count);
    let first_weighted = capital / weights;
    let last_weighted = first_weighted * multiplier.powf(f64::from(count - 1));
    if !(weights.is_finite()
        && is_finite_positive(first_weighted)
        && is_finite_positive(last_weighted))
    {
        return Err(InvalidInputError::Unrepresentable(fields::MARTINGALE_MULTIPLIER));
    }

    let rounds = f64::from(count);
    let quantities = [
        equal_amount / price,
        equal_amount / last_price,
        first_weighted / price,
        last_weighted / last_price,
    ];
    // The cumulative quantity is bounded by count times the largest round.
    if quantities
        .iter()
        .any(|&q| !(is_finite_positive(q) && (q * rounds).is_finite()))
    {
        return Err(InvalidInputError::QuantityOutOfRange);
    }

    Ok(())
}

fn is_finite_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, InvalidInputError> {
    if !value.is_finite() {
        return Err(InvalidInputError::NotNumeric {
            field,
            value: value.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(InvalidInputError::NotPositive { field, value });
    }
    Ok(value)
}

/// The five inputs in their raw, user-editable string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputForm {
    pub current_price: String,
    pub total_capital: String,
    pub split_count: String,
    pub drop_rate: String,
    pub martingale_multiplier: String,
}

impl Default for InputForm {
    fn default() -> Self {
        Self {
            current_price: "0".to_string(),
            total_capital: "0".to_string(),
            split_count: "0".to_string(),
            drop_rate: "0".to_string(),
            martingale_multiplier: "0".to_string(),
        }
    }
}

impl InputForm {
    /// Parse and validate the whole form. Fails on the first bad field.
    ///
    /// Price and capital may carry comma thousands separators.
    pub fn parse(&self) -> Result<SplitParams, InvalidInputError> {
        let price = parse_number(fields::CURRENT_PRICE, &self.current_price, true)?;
        let capital = parse_number(fields::TOTAL_CAPITAL, &self.total_capital, true)?;
        let count = parse_count(&self.split_count)?;
        let drop_rate = parse_number(fields::DROP_RATE, &self.drop_rate, false)?;
        let multiplier = parse_number(
            fields::MARTINGALE_MULTIPLIER,
            &self.martingale_multiplier,
            false,
        )?;

        SplitParams::new(price, capital, count, drop_rate, multiplier)
    }
}

fn parse_number(
    field: &'static str,
    raw: &str,
    allow_grouping: bool,
) -> Result<f64, InvalidInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::Missing(field));
    }

    let parsed = if allow_grouping {
        parse_formatted_number(trimmed)
    } else {
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    };

    parsed.ok_or_else(|| InvalidInputError::NotNumeric {
        field,
        value: raw.to_string(),
    })
}

fn parse_count(raw: &str) -> Result<u32, InvalidInputError> {
    let field = fields::SPLIT_COUNT;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::Missing(field));
    }

    match trimmed.parse::<i64>() {
        Ok(count) if count <= 0 => Err(InvalidInputError::NotPositive {
            field,
            value: count as f64,
        }),
        Ok(count) => u32::try_from(count).map_err(|_| InvalidInputError::TooManyRounds {
            count: count as u64,
            max: u32::MAX,
        }),
        Err(_) if trimmed.parse::<f64>().is_ok() => Err(InvalidInputError::NotInteger {
            field,
            value: raw.to_string(),
        }),
        Err(_) => Err(InvalidInputError::NotNumeric {
            field,
            value: raw.to_string(),
        }),
    }
}
