//! Expansion windows and week navigation.

use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate};

use crate::constants::DAYS_PER_WEEK;
use crate::timezone::TimeZonePolicy;

/// Inclusive `[start, end]` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ExpansionWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        ExpansionWindow { start, end }
    }

    /// From local midnight of `first` to the last instant of `last`.
    pub fn for_days(first: NaiveDate, last: NaiveDate, timezone: &TimeZonePolicy) -> Option<Self> {
        let start = timezone.resolve(first.and_hms_opt(0, 0, 0)?)?;
        let end = timezone.resolve(last.and_hms_milli_opt(23, 59, 59, 999)?)?;
        Some(ExpansionWindow { start, end })
    }

    /// The seven days starting at `week_start`.
    pub fn for_week(week_start: NaiveDate, timezone: &TimeZonePolicy) -> Option<Self> {
        Self::for_days(week_start, week_end_of(week_start)?, timezone)
    }

    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Monday of the week containing `date`; a Sunday belongs to the week before.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Last day of a week starting at `week_start`.
pub fn week_end_of(week_start: NaiveDate) -> Option<NaiveDate> {
    week_start.checked_add_days(Days::new((DAYS_PER_WEEK - 1) as u64))
}

/// Move by whole weeks without re-aligning to Monday.
pub fn shift_week(week_start: NaiveDate, delta: i64) -> Option<NaiveDate> {
    week_start.checked_add_signed(Duration::try_weeks(delta)?)
}

/// Display label such as "Jan 5 - Jan 11, 2026".
pub fn week_label(week_start: NaiveDate) -> String {
    match week_end_of(week_start) {
        Some(end) => format!("{} - {}", week_start.format("%b %-d"), end.format("%b %-d, %Y")),
        None => week_start.format("%b %-d, %Y").to_string(),
    }
}
