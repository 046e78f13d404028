//! Personal events and their concrete occurrences.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceRule;
use crate::timezone::instant_format;

/// Identifier of a stored record; numeric or string depending on the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Numeric(id) => write!(f, "{id}"),
            EventId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId::Numeric(id)
    }
}

impl From<i32> for EventId {
    fn from(id: i32) -> Self {
        EventId::Numeric(i64::from(id))
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Text(id.to_string())
    }
}

/// A personal event as stored, before expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringEventSource {
    pub id: EventId,
    pub title: String,
    #[serde(with = "instant_format")]
    pub start_at: DateTime<FixedOffset>,
    #[serde(with = "instant_format")]
    pub end_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    /// Absent means a single occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<RecurrenceRule>,
}

impl RecurringEventSource {
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start_at: DateTime<FixedOffset>,
        end_at: DateTime<FixedOffset>,
    ) -> Self {
        RecurringEventSource {
            id: id.into(),
            title: title.into(),
            start_at,
            end_at,
            is_all_day: false,
            color_hex: None,
            recurrence_rule: None,
        }
    }

    pub fn with_rule(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence_rule = Some(rule);
        self
    }

    /// Length every occurrence inherits.
    pub fn duration(&self) -> Duration {
        self.end_at - self.start_at
    }

    /// The source itself as its only occurrence.
    pub fn as_single_instance(&self) -> EventInstance {
        EventInstance {
            id: self.id.to_string(),
            original_id: self.id.clone(),
            title: self.title.clone(),
            start_at: self.start_at,
            end_at: self.end_at,
            is_all_day: self.is_all_day,
            color_hex: self.color_hex.clone(),
        }
    }
}

/// One concrete occurrence. Regenerated on every expansion, never stored.
///
/// `id` is `"{original_id}_{YYYY-MM-DD}"` for recurring sources and just the
/// source id otherwise, so repeated expansions produce the same keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInstance {
    pub id: String,
    /// Back-reference used to map edits and deletes to the stored record.
    #[serde(rename = "originalId")]
    pub original_id: EventId,
    pub title: String,
    #[serde(with = "instant_format")]
    pub start_at: DateTime<FixedOffset>,
    #[serde(with = "instant_format")]
    pub end_at: DateTime<FixedOffset>,
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

impl EventInstance {
    pub fn duration(&self) -> Duration {
        self.end_at - self.start_at
    }
}
