//! Schedule items: the server's pre-expanded records and the render-ready union.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{PENDING_CANCEL_COLOR, TIME_OF_DAY_FORMAT};
use crate::event::{EventId, EventInstance};
use crate::timezone::TimeZonePolicy;

/// Which subsystem produced an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// A class slot generated from a recurring schedule rule.
    ScheduleRule,
    PersonalEvent,
    /// A one-off booking.
    CenterSession,
    Unknown(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::ScheduleRule => "SCHEDULE_RULE",
            ItemKind::PersonalEvent => "PERSONAL_EVENT",
            ItemKind::CenterSession => "CENTER_SESSION",
            ItemKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ItemKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "SCHEDULE_RULE" => ItemKind::ScheduleRule,
            "PERSONAL_EVENT" => ItemKind::PersonalEvent,
            "CENTER_SESSION" => ItemKind::CenterSession,
            _ => ItemKind::Unknown(raw),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a server item. Only `PENDING_CANCEL` changes rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    PendingCancel,
    Other(String),
}

impl ItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ItemStatus::PendingCancel => "PENDING_CANCEL",
            ItemStatus::Other(raw) => raw,
        }
    }

    /// Color forced by this status, if any.
    pub fn display_color(&self) -> Option<&'static str> {
        match self {
            ItemStatus::PendingCancel => Some(PENDING_CANCEL_COLOR),
            ItemStatus::Other(_) => None,
        }
    }
}

impl From<String> for ItemStatus {
    fn from(raw: String) -> Self {
        if raw == "PENDING_CANCEL" {
            ItemStatus::PendingCancel
        } else {
            ItemStatus::Other(raw)
        }
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::PendingCancel => "PENDING_CANCEL".to_string(),
            ItemStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schedule record already expanded by the scheduling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerScheduleItem {
    pub id: EventId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub title: String,
    /// `YYYY-MM-DD`. Items without one are left out of the week.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub center_id: Option<i64>,
    #[serde(default)]
    pub center_name: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub rule_id: Option<i64>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub is_cross_day_part: bool,
}

/// Payload of a personal event in the week view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PersonalPayload {
    /// Expanded on our side from a recurring source.
    Expanded(EventInstance),
    /// Delivered already expanded by the server.
    Server(Option<Value>),
}

/// Provenance of a schedule item together with its payload.
///
/// Serialized as `"type"` plus `"data"` next to the item's other fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ItemSource {
    #[serde(rename = "SCHEDULE_RULE")]
    ScheduleRule(Option<Value>),
    #[serde(rename = "PERSONAL_EVENT")]
    PersonalEvent(PersonalPayload),
    #[serde(rename = "CENTER_SESSION")]
    CenterSession(Option<Value>),
    /// A kind this crate doesn't know; carried through untouched.
    #[serde(rename = "OPAQUE")]
    Opaque { kind: String, payload: Option<Value> },
}

impl ItemSource {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemSource::ScheduleRule(_) => ItemKind::ScheduleRule,
            ItemSource::PersonalEvent(_) => ItemKind::PersonalEvent,
            ItemSource::CenterSession(_) => ItemKind::CenterSession,
            ItemSource::Opaque { kind, .. } => ItemKind::Unknown(kind.clone()),
        }
    }
}

/// One entry in a day bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleItem {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<i64>,
    pub is_cross_day_part: bool,
    #[serde(flatten)]
    pub source: ItemSource,
}

impl ScheduleItem {
    /// Map a server record onto the bucket for `date`.
    ///
    /// `PENDING_CANCEL` forces the amber color; any other status leaves it unset.
    pub fn from_server(item: &ServerScheduleItem, date: NaiveDate) -> Self {
        let data = item.data.clone();
        let source = match &item.kind {
            ItemKind::ScheduleRule => ItemSource::ScheduleRule(data),
            ItemKind::PersonalEvent => ItemSource::PersonalEvent(PersonalPayload::Server(data)),
            ItemKind::CenterSession => ItemSource::CenterSession(data),
            ItemKind::Unknown(kind) => ItemSource::Opaque {
                kind: kind.clone(),
                payload: data,
            },
        };

        ScheduleItem {
            id: item.id.to_string(),
            title: item.title.clone(),
            date,
            start_time: item.start_time.clone(),
            end_time: item.end_time.clone(),
            status: item.status.clone(),
            color: item
                .status
                .as_ref()
                .and_then(ItemStatus::display_color)
                .map(str::to_string),
            center_name: item.center_name.clone(),
            room_id: item.room_id,
            center_id: item.center_id,
            rule_id: item.rule_id,
            is_cross_day_part: item.is_cross_day_part,
            source,
        }
    }

    /// A personal-event occurrence, timed on the policy's wall clock.
    pub fn from_instance(instance: &EventInstance, timezone: &TimeZonePolicy) -> Self {
        let start = timezone.local(&instance.start_at);
        let end = timezone.local(&instance.end_at);

        ScheduleItem {
            id: instance.id.clone(),
            title: instance.title.clone(),
            date: start.date(),
            start_time: start.format(TIME_OF_DAY_FORMAT).to_string(),
            end_time: end.format(TIME_OF_DAY_FORMAT).to_string(),
            status: None,
            color: instance.color_hex.clone(),
            center_name: None,
            room_id: None,
            center_id: None,
            rule_id: None,
            is_cross_day_part: false,
            source: ItemSource::PersonalEvent(PersonalPayload::Expanded(instance.clone())),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.source.kind()
    }
}
