//! Pure computation engine: allocation schedules and partial-execution summaries.
//!
//! Nothing here performs I/O or holds state between calls; identical inputs
//! always produce identical schedules.

pub mod aggregate;
pub mod allocation;

pub use aggregate::aggregate;
pub use allocation::{compute, entry_price, sum_of_weights, try_compute};
