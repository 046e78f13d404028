//! Recurrence rules as stored on personal events.
//!
//! The rule is kept in its wire shape so malformed values (an unknown
//! frequency, an interval of `0` or `1.5`) still deserialize. Validation turns
//! a rule into a [`Cadence`]; anything that does not validate expands to nothing.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DATE_FORMAT;

/// How often a rule repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    /// Any value we don't recognize, preserved verbatim.
    Other(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Biweekly => "BIWEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Other(raw) => raw,
        }
    }
}

impl From<String> for Frequency {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "BIWEEKLY" => Frequency::Biweekly,
            "MONTHLY" => Frequency::Monthly,
            _ => Frequency::Other(raw),
        }
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed step between two consecutive occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Days(u32),
    Months(u32),
}

/// A frequency plus interval, with optional bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(alias = "type")]
    pub frequency: Frequency,

    /// Raw JSON number. Absent means 1; an explicit `null` is kept as
    /// `Some(None)` and fails validation.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<Option<f64>>,

    /// Last local date an occurrence may fall on (inclusive).
    #[serde(
        default,
        deserialize_with = "deserialize_bound_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,

    /// Timestamp form of the same bound; only its date part is used.
    #[serde(
        default,
        deserialize_with = "deserialize_bound_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub until: Option<NaiveDate>,

    /// Maximum number of occurrences, counted from the anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceRule {
            frequency,
            interval: None,
            end_date: None,
            until: None,
            count: None,
        }
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(Some(f64::from(interval)));
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    /// Effective last date: the earlier of `end_date` and `until` when both are set.
    pub fn last_date(&self) -> Option<NaiveDate> {
        match (self.end_date, self.until) {
            (Some(end_date), Some(until)) => Some(end_date.min(until)),
            (end_date, until) => end_date.or(until),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// The interval as a positive integer, or `None` if it isn't one.
    ///
    /// Integers past `u32::MAX` are rejected as well: no walk could take a
    /// second step that large.
    pub fn interval(&self) -> Option<u32> {
        match self.interval {
            None => Some(1),
            Some(Some(raw)) if raw >= 1.0 && raw.fract() == 0.0 && raw <= f64::from(u32::MAX) => {
                Some(raw as u32)
            }
            Some(_) => None,
        }
    }

    /// Step between occurrences, or `None` when the rule is invalid.
    pub fn cadence(&self) -> Option<Cadence> {
        let interval = self.interval()?;

        if self.count == Some(0) {
            return None;
        }

        match self.frequency {
            Frequency::Daily => Some(Cadence::Days(interval)),
            Frequency::Weekly => interval.checked_mul(7).map(Cadence::Days),
            Frequency::Biweekly => interval.checked_mul(14).map(Cadence::Days),
            Frequency::Monthly => Some(Cadence::Months(interval)),
            Frequency::Other(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.cadence().is_some()
    }

    /// Human-readable label, e.g. "Weekly" or "Every 3 days".
    ///
    /// Empty for an invalid rule.
    pub fn label(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }

        let Some(interval) = self.interval() else {
            return String::new();
        };

        let (single, unit) = match self.frequency {
            Frequency::Daily => ("Daily", "days"),
            Frequency::Weekly => ("Weekly", "weeks"),
            Frequency::Biweekly => ("Biweekly", "fortnights"),
            Frequency::Monthly => ("Monthly", "months"),
            Frequency::Other(_) => return String::new(),
        };

        if interval == 1 {
            single.to_string()
        } else {
            format!("Every {interval} {unit}")
        }
    }
}

/// Whether a possibly absent rule is present and valid.
pub fn is_valid(rule: Option<&RecurrenceRule>) -> bool {
    rule.is_some_and(RecurrenceRule::is_valid)
}

/// Label for a possibly absent rule; empty when absent or invalid.
pub fn label(rule: Option<&RecurrenceRule>) -> String {
    rule.map(RecurrenceRule::label).unwrap_or_default()
}

/// Present fields land in `Some`, so `null` is told apart from a missing key.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Accept either a bare date or a full timestamp (only its date part is used).
fn deserialize_bound_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid end date '{raw}'")))
}
