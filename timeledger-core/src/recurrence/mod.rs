//! Recurrence rules and their expansion into concrete occurrences.

mod expand;
mod rule;
mod walk;

pub use expand::RecurrenceExpander;
pub use rule::{is_valid, label, Cadence, Frequency, RecurrenceRule};
pub use walk::MonthEndPolicy;
