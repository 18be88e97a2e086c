//! Human-friendly numeric parsing and display.
//!
//! Engine outputs stay full-precision `f64`; rounding to a fixed number of
//! fraction digits happens only here, through rust_decimal so that display
//! rounding is decimal rather than binary.

use super::{Round, Summary};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub const AMOUNT_FRACTION_DIGITS: u32 = 0;
pub const PRICE_FRACTION_DIGITS: u32 = 4;
pub const QUANTITY_FRACTION_DIGITS: u32 = 8;
pub const AVERAGE_PRICE_FRACTION_DIGITS: u32 = 8;

/// Parse a number that may contain comma thousands separators.
///
/// Returns `None` for empty, non-numeric, or non-finite input.
pub fn parse_formatted_number(value: &str) -> Option<f64> {
    let stripped: String = value.chars().filter(|c| *c != ',').collect();
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Regroup raw input with thousands separators, keeping the fraction verbatim.
///
/// Input that does not parse as a number is returned unchanged so partially
/// typed values are not destroyed.
pub fn format_number_string(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    let stripped: String = value.chars().filter(|c| *c != ',').collect();
    if stripped.trim().parse::<f64>().is_err() {
        return value.to_string();
    }

    let (integer_part, fractional_part) = match stripped.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (stripped.as_str(), ""),
    };
    let grouped = group_thousands(integer_part);

    if fractional_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, fractional_part)
    }
}

/// Render a value with grouping and at most `max_fraction_digits` decimals.
pub fn format_number(value: f64, max_fraction_digits: u32) -> String {
    let Some(decimal) = Decimal::from_f64_retain(value) else {
        return value.to_string();
    };

    let mut rounded = decimal
        .round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }

    let text = rounded.to_string();
    match text.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(&text),
    }
}

fn group_thousands(integer_part: &str) -> String {
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

/// A round rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDisplay {
    pub round: u32,
    pub entry_price: String,
    pub entry_amount: String,
    pub quantity: String,
    pub cumulative_entry_amount: String,
    pub cumulative_quantity: String,
    pub average_price: String,
}

impl From<&Round> for RoundDisplay {
    fn from(row: &Round) -> Self {
        Self {
            round: row.round,
            entry_price: format_number(row.entry_price, PRICE_FRACTION_DIGITS),
            entry_amount: format_number(row.entry_amount, AMOUNT_FRACTION_DIGITS),
            quantity: format_number(row.quantity, QUANTITY_FRACTION_DIGITS),
            cumulative_entry_amount: format_number(
                row.cumulative_entry_amount,
                AMOUNT_FRACTION_DIGITS,
            ),
            cumulative_quantity: format_number(row.cumulative_quantity, QUANTITY_FRACTION_DIGITS),
            average_price: format_number(row.average_price, AVERAGE_PRICE_FRACTION_DIGITS),
        }
    }
}

/// A summary rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDisplay {
    pub final_average_price: String,
    pub total_entry_amount: String,
    pub total_held_quantity: String,
}

impl From<&Summary> for SummaryDisplay {
    fn from(summary: &Summary) -> Self {
        Self {
            final_average_price: format_number(
                summary.final_average_price,
                AVERAGE_PRICE_FRACTION_DIGITS,
            ),
            total_entry_amount: format_number(summary.total_entry_amount, AMOUNT_FRACTION_DIGITS),
            total_held_quantity: format_number(
                summary.total_held_quantity,
                QUANTITY_FRACTION_DIGITS,
            ),
        }
    }
}
