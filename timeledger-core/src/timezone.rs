//! Wall-clock policy for turning instants into local dates and back.
//!
//! Every instant handled by timeledger is stored with an explicit offset. The
//! policy decides which wall clock defines "the local date" of an instant, which
//! is what instance ids, day buckets and calendar stepping are computed from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::{DATE_FORMAT, INSTANT_FORMAT};
use crate::error::{TimeLedgerError, TimeLedgerResult};

const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;

/// The zone whose wall clock defines "local" for expansion and composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZonePolicy {
    /// A fixed offset with no daylight saving.
    Fixed(FixedOffset),
    /// A named IANA zone; the offset follows the zone's transitions.
    Named(Tz),
}

impl Default for TimeZonePolicy {
    /// Asia/Taipei wall clock, pinned at `+08:00`.
    fn default() -> Self {
        let offset = FixedOffset::east_opt(TAIPEI_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        TimeZonePolicy::Fixed(offset)
    }
}

impl FromStr for TimeZonePolicy {
    type Err = TimeLedgerError;

    /// Accepts `+08:00` style offsets, `UTC`/`Z`, or an IANA zone name.
    fn from_str(s: &str) -> TimeLedgerResult<Self> {
        let trimmed = s.trim();

        if trimmed == "Z" || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(TimeZonePolicy::Fixed(Utc.fix()));
        }

        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            return trimmed
                .parse::<FixedOffset>()
                .map(TimeZonePolicy::Fixed)
                .map_err(|_| TimeLedgerError::UnknownTimeZone(s.to_string()));
        }

        trimmed
            .parse::<Tz>()
            .map(TimeZonePolicy::Named)
            .map_err(|_| TimeLedgerError::UnknownTimeZone(s.to_string()))
    }
}

impl fmt::Display for TimeZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZonePolicy::Fixed(offset) => write!(f, "{offset}"),
            TimeZonePolicy::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl TimeZonePolicy {
    /// Wall-clock reading of an instant.
    pub fn local(&self, instant: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            TimeZonePolicy::Fixed(offset) => instant.with_timezone(offset).naive_local(),
            TimeZonePolicy::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Local calendar date of an instant.
    pub fn local_date(&self, instant: &DateTime<FixedOffset>) -> NaiveDate {
        self.local(instant).date()
    }

    /// The same instant, re-expressed in the policy's offset.
    pub fn to_policy_offset(&self, instant: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            TimeZonePolicy::Fixed(offset) => instant.with_timezone(offset),
            TimeZonePolicy::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }

    /// Instant for a wall-clock reading.
    ///
    /// Ambiguous readings (fall-back fold) take the earliest instant. Readings
    /// inside a spring-forward gap move one hour later, the way a local-time
    /// calendar library lands on the first valid time after the gap.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            TimeZonePolicy::Fixed(offset) => offset.from_local_datetime(&local).single(),
            TimeZonePolicy::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .or_else(|| {
                    let shifted = local.checked_add_signed(Duration::hours(1))?;
                    tz.from_local_datetime(&shifted).earliest()
                })
                .map(|dt| dt.fixed_offset()),
        }
    }

    /// Today's date on this wall clock.
    pub fn today(&self) -> NaiveDate {
        self.local_date(&Utc::now().fixed_offset())
    }

    /// Parse user input as an instant.
    ///
    /// - `YYYY-MM-DD` is local midnight of that date
    /// - `YYYY-MM-DDTHH:MM:SS` without an offset is a local wall-clock reading
    /// - anything else must be RFC 3339
    pub fn parse_instant(&self, s: &str) -> TimeLedgerResult<DateTime<FixedOffset>> {
        let invalid = || TimeLedgerError::InvalidDateTime(s.to_string());

        if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
            return self.resolve(midnight).ok_or_else(invalid);
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return self.resolve(naive).ok_or_else(invalid);
        }

        DateTime::parse_from_rfc3339(s).map_err(|_| invalid())
    }
}

/// Render an instant as `YYYY-MM-DDTHH:MM:SS+HH:MM`.
pub fn format_instant(instant: &DateTime<FixedOffset>) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Serde adapter writing instants without fractional seconds.
///
/// Reading accepts any RFC 3339 string.
pub mod instant_format {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        instant: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_instant(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Timelike};

    fn taipei(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_default_policy_is_plus_eight() {
        let policy = TimeZonePolicy::default();
        assert_eq!(policy.to_string(), "+08:00");
    }

    #[test]
    fn test_parse_policy_variants() {
        assert_eq!("+08:00".parse::<TimeZonePolicy>().unwrap(), TimeZonePolicy::default());
        assert_eq!("UTC".parse::<TimeZonePolicy>().unwrap(), TimeZonePolicy::Fixed(Utc.fix()));
        assert_eq!(
            "Asia/Taipei".parse::<TimeZonePolicy>().unwrap(),
            TimeZonePolicy::Named(chrono_tz::Asia::Taipei)
        );
        assert!("Mars/Olympus".parse::<TimeZonePolicy>().is_err());
    }

    #[test]
    fn test_local_date_uses_policy_not_utc() {
        let policy = TimeZonePolicy::default();
        // 23:30 UTC on the 5th is already the 6th in Taipei
        let instant = taipei("2026-01-05T23:30:00Z");
        assert_eq!(policy.local_date(&instant), NaiveDate::from_ymd_opt(2026, 1, 6).unwrap());
    }

    #[test]
    fn test_format_instant_has_no_fraction() {
        let policy = TimeZonePolicy::default();
        let instant = policy.to_policy_offset(&taipei("2026-01-06T01:00:00.250Z"));
        assert_eq!(format_instant(&instant), "2026-01-06T09:00:00+08:00");
    }

    #[test]
    fn test_parse_instant_date_is_local_midnight() {
        let policy = TimeZonePolicy::default();
        let instant = policy.parse_instant("2026-01-10").unwrap();
        assert_eq!(format_instant(&instant), "2026-01-10T00:00:00+08:00");
        assert!(policy.parse_instant("10/01/2026").is_err());
    }

    #[test]
    fn test_resolve_skips_spring_forward_gap() {
        let policy = TimeZonePolicy::Named(chrono_tz::America::New_York);
        let in_gap = NaiveDate::from_ymd_opt(2026, 3, 8)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(2, 30, 0).unwrap());

        let resolved = policy.resolve(in_gap).unwrap();
        assert_eq!(resolved.hour(), 3);
        assert_eq!(resolved.minute(), 30);
    }
}
