//! Domain types for the split purchase simulator.
//!
//! This module provides:
//! - Validated calculation inputs and their raw editable form
//! - Round, Schedule and Summary types with camelCase JSON serialization
//! - Executed-round selection keyed per configured scope
//! - Human-friendly number parsing and display formatting

pub mod format;
pub mod inputs;
pub mod primitives;
pub mod schedule;
pub mod selection;

pub use format::{RoundDisplay, SummaryDisplay};
pub use inputs::{InputForm, InvalidInputError, SplitParams};
pub use primitives::{Policy, SelectionScope};
pub use schedule::{Round, Schedule, Schedules, Summary};
pub use selection::ExecutionSelection;
