//! Recurrence expansion and weekly schedule composition for timeledger.
//!
//! - `recurrence` turns a recurring event into its occurrences inside a window
//! - `schedule` buckets server items and personal events into a seven-day view
//! - `timezone` decides which wall clock defines a local date
//!
//! Expansion and composition are pure: they never perform I/O and never fail.

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod schedule;
pub mod timezone;
pub mod window;

pub use event::{EventId, EventInstance, RecurringEventSource};
pub use recurrence::{MonthEndPolicy, RecurrenceExpander, RecurrenceRule};
pub use schedule::{ScheduleComposer, WeekView};
pub use timezone::TimeZonePolicy;
