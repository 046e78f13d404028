//! Per-day, per-week composition of heterogeneous schedule sources.

mod compose;
mod item;

pub use compose::{DaySchedule, ScheduleComposer, WeekView};
pub use item::{ItemKind, ItemSource, ItemStatus, PersonalPayload, ScheduleItem, ServerScheduleItem};
