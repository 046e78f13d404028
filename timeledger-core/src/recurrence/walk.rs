//! Wall-clock stepping from an anchor.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::rule::Cadence;
use crate::error::TimeLedgerError;

/// What monthly stepping does when the anchor's day-of-month doesn't exist
/// in the target month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthEndPolicy {
    /// Spill the missing days into the following month (Jan 31 + 1 month is
    /// Mar 3 in a common year) and keep stepping from there.
    #[default]
    Overflow,
    /// Use the last day of the target month, always measured from the anchor.
    Clamp,
}

impl FromStr for MonthEndPolicy {
    type Err = TimeLedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overflow" => Ok(MonthEndPolicy::Overflow),
            "clamp" => Ok(MonthEndPolicy::Clamp),
            _ => Err(TimeLedgerError::UnknownMonthEndPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for MonthEndPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthEndPolicy::Overflow => write!(f, "overflow"),
            MonthEndPolicy::Clamp => write!(f, "clamp"),
        }
    }
}

/// Successive local positions of a recurrence, anchor first.
///
/// Positions are strictly increasing. The walk ends when date arithmetic
/// leaves chrono's supported range.
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    anchor: NaiveDateTime,
    current: Option<NaiveDateTime>,
    cadence: Cadence,
    month_end: MonthEndPolicy,
    steps: u32,
}

impl Walk {
    pub(crate) fn new(anchor: NaiveDateTime, cadence: Cadence, month_end: MonthEndPolicy) -> Self {
        Walk {
            anchor,
            current: Some(anchor),
            cadence,
            month_end,
            steps: 0,
        }
    }

    fn advance(&self, current: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.cadence {
            Cadence::Days(days) => current.checked_add_days(Days::new(u64::from(days))),
            Cadence::Months(months) => match self.month_end {
                MonthEndPolicy::Overflow => add_months_overflowing(current, months),
                MonthEndPolicy::Clamp => {
                    let total = self.steps.checked_mul(months)?;
                    self.anchor.checked_add_months(Months::new(total))
                }
            },
        }
    }
}

impl Iterator for Walk {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let current = self.current.take()?;
        if let Some(steps) = self.steps.checked_add(1) {
            self.steps = steps;
            self.current = self.advance(current);
        }
        Some(current)
    }
}

/// Add calendar months keeping the day-of-month, letting a day the target
/// month lacks roll into the next month.
fn add_months_overflowing(current: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    let date = current.date();
    let month_index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);

    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let target = first_of_month.checked_add_days(Days::new(u64::from(date.day0())))?;

    Some(target.and_time(current.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn dates(walk: Walk, n: usize) -> Vec<NaiveDate> {
        walk.take(n).map(|p| p.date()).collect()
    }

    #[test]
    fn test_daily_walk_starts_at_anchor() {
        let walk = Walk::new(at(2026, 1, 6), Cadence::Days(1), MonthEndPolicy::Overflow);
        assert_eq!(
            dates(walk, 3),
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 6).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            ]
        );
    }

    #[test]
    fn test_month_overflow_drifts() {
        let walk = Walk::new(at(2026, 1, 31), Cadence::Months(1), MonthEndPolicy::Overflow);
        assert_eq!(
            dates(walk, 4),
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                NaiveDate::from_ymd_opt(2026, 4, 3).unwrap(),
                NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_month_overflow_in_leap_year() {
        let walk = Walk::new(at(2028, 1, 30), Cadence::Months(1), MonthEndPolicy::Overflow);
        assert_eq!(dates(walk, 2)[1], NaiveDate::from_ymd_opt(2028, 3, 1).unwrap());
    }

    #[test]
    fn test_month_clamp_keeps_anchor_day() {
        let walk = Walk::new(at(2026, 1, 31), Cadence::Months(1), MonthEndPolicy::Clamp);
        assert_eq!(
            dates(walk, 4),
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            ]
        );
    }

    #[test]
    fn test_month_step_crosses_year() {
        let walk = Walk::new(at(2026, 11, 15), Cadence::Months(2), MonthEndPolicy::Overflow);
        assert_eq!(dates(walk, 2)[1], NaiveDate::from_ymd_opt(2027, 1, 15).unwrap());
    }

    #[test]
    fn test_walk_keeps_time_of_day() {
        let walk = Walk::new(at(2026, 1, 15), Cadence::Months(1), MonthEndPolicy::Overflow);
        assert!(walk.take(3).all(|p| p.time() == at(2026, 1, 15).time()));
    }

    #[test]
    fn test_walk_ends_at_calendar_limit() {
        let anchor = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap();
        let walk = Walk::new(anchor, Cadence::Days(1), MonthEndPolicy::Overflow);
        assert_eq!(walk.count(), 1);
    }

    #[test]
    fn test_month_end_policy_parses() {
        assert_eq!("clamp".parse::<MonthEndPolicy>().unwrap(), MonthEndPolicy::Clamp);
        assert_eq!("Overflow".parse::<MonthEndPolicy>().unwrap(), MonthEndPolicy::Overflow);
        assert!("round".parse::<MonthEndPolicy>().is_err());
    }
}
