//! Week composition: server items and personal events bucketed by day.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, trace};

use super::item::{ScheduleItem, ServerScheduleItem};
use crate::constants::{DATE_FORMAT, DAYS_PER_WEEK};
use crate::event::RecurringEventSource;
use crate::recurrence::RecurrenceExpander;
use crate::window::ExpansionWindow;

/// One day of the week view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: u32,
    pub items: Vec<ScheduleItem>,
}

/// Seven day buckets, `week_start..=week_end`. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DaySchedule>,
}

impl WeekView {
    pub fn day(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn item_count(&self) -> usize {
        self.days.iter().map(|day| day.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleComposer {
    expander: RecurrenceExpander,
}

impl ScheduleComposer {
    pub fn new(expander: RecurrenceExpander) -> Self {
        ScheduleComposer { expander }
    }

    pub fn expander(&self) -> &RecurrenceExpander {
        &self.expander
    }

    /// Compose the week starting at `week_start`.
    ///
    /// `week_start` is used as given; normalizing to a Monday is the caller's
    /// job (see [`crate::window::week_start_of`]). Within a day, server items
    /// come first in input order, then personal-event occurrences in expansion
    /// order. Server items without a date are dropped.
    pub fn compose_week(
        &self,
        week_start: NaiveDate,
        server_items: &[ServerScheduleItem],
        personal_events: &[RecurringEventSource],
    ) -> WeekView {
        let timezone = self.expander.timezone;

        let dates: Vec<NaiveDate> = (0..DAYS_PER_WEEK as u64)
            .map_while(|offset| week_start.checked_add_days(Days::new(offset)))
            .collect();
        let week_end = dates.last().copied().unwrap_or(week_start);

        // Non-recurring sources come back unfiltered, so check the window again
        let mut personal_by_date: HashMap<NaiveDate, Vec<ScheduleItem>> = HashMap::new();
        if let Some(window) = ExpansionWindow::for_days(week_start, week_end, &timezone) {
            for instance in self
                .expander
                .expand_many(personal_events, &window.start, &window.end)
                .into_iter()
                .filter(|instance| window.contains(&instance.start_at))
            {
                let item = ScheduleItem::from_instance(&instance, &timezone);
                personal_by_date.entry(item.date).or_default().push(item);
            }
        }

        let mut server_by_date: HashMap<&str, Vec<&ServerScheduleItem>> = HashMap::new();
        for item in server_items {
            match item.date.as_deref() {
                Some(date) => server_by_date.entry(date).or_default().push(item),
                None => trace!(id = %item.id, "Dropping server item without a date"),
            }
        }

        let days: Vec<DaySchedule> = dates
            .iter()
            .map(|&date| {
                let key = date.format(DATE_FORMAT).to_string();

                let mut items: Vec<ScheduleItem> = server_by_date
                    .get(key.as_str())
                    .into_iter()
                    .flatten()
                    .map(|item| ScheduleItem::from_server(item, date))
                    .collect();
                items.extend(personal_by_date.remove(&date).unwrap_or_default());

                DaySchedule {
                    date,
                    day_of_week: date.weekday().num_days_from_sunday(),
                    items,
                }
            })
            .collect();

        let view = WeekView {
            week_start,
            week_end,
            days,
        };

        debug!(
            week_start = %view.week_start,
            server_items = server_items.len(),
            personal_events = personal_events.len(),
            items = view.item_count(),
            "Composed week"
        );

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{Frequency, RecurrenceRule};
    use crate::schedule::{ItemKind, ItemStatus};
    use chrono::{DateTime, FixedOffset};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn server_item(id: i64, date: Option<&str>, status: &str) -> ServerScheduleItem {
        serde_json::from_value(json!({
            "id": id, "type": "SCHEDULE_RULE", "title": format!("Class {id}"),
            "date": date, "start_time": "10:00", "end_time": "11:00",
            "center_id": 1, "status": status
        }))
        .unwrap()
    }

    fn personal(
        id: i64,
        start: &str,
        end: &str,
        rule: Option<RecurrenceRule>,
    ) -> RecurringEventSource {
        RecurringEventSource {
            recurrence_rule: rule,
            ..RecurringEventSource::new(id, "Personal", instant(start), instant(end))
        }
    }

    fn item_ids(view: &WeekView, day: NaiveDate) -> Vec<String> {
        view.day(day).unwrap().items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_week_has_seven_empty_days() {
        let composer = ScheduleComposer::default();

        let view = composer.compose_week(date(2026, 1, 5), &[], &[]);

        assert_eq!(view.days.len(), 7);
        assert!(view.days.iter().all(|day| day.items.is_empty()));
        assert_eq!(view.week_start, date(2026, 1, 5));
        assert_eq!(view.week_end, date(2026, 1, 11));
        assert_eq!(view.days[0].date, view.week_start);
        assert_eq!(view.days[6].date, view.week_end);
    }

    #[test]
    fn test_day_of_week_counts_from_sunday() {
        let view = ScheduleComposer::default().compose_week(date(2026, 1, 5), &[], &[]);
        let weekdays: Vec<u32> = view.days.iter().map(|day| day.day_of_week).collect();

        assert_eq!(weekdays, vec![1, 2, 3, 4, 5, 6, 0]);
    }

    #[test]
    fn test_server_items_grouped_by_date() {
        let composer = ScheduleComposer::default();
        let items = vec![
            server_item(1, Some("2026-01-05"), "CONFIRMED"),
            server_item(2, Some("2026-01-07"), "PENDING_CANCEL"),
            server_item(3, Some("2026-01-05"), "CONFIRMED"),
            server_item(4, Some("2026-01-20"), "CONFIRMED"),
        ];

        let view = composer.compose_week(date(2026, 1, 5), &items, &[]);

        assert_eq!(item_ids(&view, date(2026, 1, 5)), vec!["1", "3"]);
        assert_eq!(item_ids(&view, date(2026, 1, 7)), vec!["2"]);
        assert_eq!(view.item_count(), 3);

        let pending = &view.day(date(2026, 1, 7)).unwrap().items[0];
        assert_eq!(pending.status, Some(ItemStatus::PendingCancel));
        assert_eq!(pending.color.as_deref(), Some("#F59E0B"));
        assert!(view.day(date(2026, 1, 5)).unwrap().items.iter().all(|i| i.color.is_none()));
    }

    #[test]
    fn test_server_item_without_date_is_dropped() {
        let composer = ScheduleComposer::default();
        let items = vec![
            server_item(1, None, "CONFIRMED"),
            server_item(2, Some("2026-01-06"), "CONFIRMED"),
        ];

        let view = composer.compose_week(date(2026, 1, 5), &items, &[]);

        assert_eq!(view.item_count(), 1);
        assert_eq!(item_ids(&view, date(2026, 1, 6)), vec!["2"]);
    }

    #[test]
    fn test_recurring_personal_event_fills_the_week() {
        let composer = ScheduleComposer::default();
        let rule = RecurrenceRule::new(Frequency::Daily);
        let events = vec![personal(
            456,
            "2026-01-01T20:00:00+08:00",
            "2026-01-01T21:00:00+08:00",
            Some(rule),
        )];

        let view = composer.compose_week(date(2026, 1, 5), &[], &events);

        // The evening occurrence on the last day counts: the window runs to 23:59:59
        assert_eq!(view.item_count(), 7);
        assert_eq!(item_ids(&view, date(2026, 1, 11)), vec!["456_2026-01-11"]);
        let sunday = &view.day(date(2026, 1, 11)).unwrap().items[0];
        assert_eq!(sunday.start_time, "20:00");
        assert_eq!(sunday.end_time, "21:00");
        assert_eq!(sunday.kind(), ItemKind::PersonalEvent);
    }

    #[test]
    fn test_single_personal_event_outside_week_is_filtered() {
        let composer = ScheduleComposer::default();
        let events = vec![
            personal(1, "2026-01-12T00:00:00+08:00", "2026-01-12T01:00:00+08:00", None),
            personal(2, "2026-01-08T09:00:00+08:00", "2026-01-08T10:00:00+08:00", None),
        ];

        let view = composer.compose_week(date(2026, 1, 5), &[], &events);

        assert_eq!(view.item_count(), 1);
        assert_eq!(item_ids(&view, date(2026, 1, 8)), vec!["2"]);
    }

    #[test]
    fn test_server_items_come_before_personal_events() {
        let composer = ScheduleComposer::default();
        let items = vec![server_item(10, Some("2026-01-06"), "CONFIRMED")];
        let events = vec![personal(
            20,
            "2026-01-06T08:00:00+08:00",
            "2026-01-06T09:00:00+08:00",
            None,
        )];

        let view = composer.compose_week(date(2026, 1, 5), &items, &events);

        assert_eq!(item_ids(&view, date(2026, 1, 6)), vec!["10", "20"]);
    }

    #[test]
    fn test_invalid_rule_contributes_nothing() {
        let composer = ScheduleComposer::default();
        let mut rule = RecurrenceRule::new(Frequency::Weekly);
        rule.interval = Some(Some(1.5));
        let events = vec![
            personal(1, "2026-01-06T09:00:00+08:00", "2026-01-06T10:00:00+08:00", Some(rule)),
            personal(2, "2026-01-07T09:00:00+08:00", "2026-01-07T10:00:00+08:00", None),
        ];

        let view = composer.compose_week(date(2026, 1, 5), &[], &events);

        assert_eq!(view.item_count(), 1);
        assert_eq!(item_ids(&view, date(2026, 1, 7)), vec!["2"]);
    }

    #[test]
    fn test_week_start_used_as_given() {
        // A Wednesday start is not re-aligned
        let view = ScheduleComposer::default().compose_week(date(2026, 1, 7), &[], &[]);

        assert_eq!(view.week_start, date(2026, 1, 7));
        assert_eq!(view.week_end, date(2026, 1, 13));
    }

    #[test_log::test]
    fn test_composition_is_repeatable() {
        let composer = ScheduleComposer::default();
        let items = vec![server_item(1, Some("2026-01-05"), "PENDING_CANCEL")];
        let events = vec![personal(
            2,
            "2026-01-05T18:00:00+08:00",
            "2026-01-05T19:00:00+08:00",
            Some(RecurrenceRule::new(Frequency::Weekly)),
        )];

        let first = composer.compose_week(date(2026, 1, 5), &items, &events);
        let second = composer.compose_week(date(2026, 1, 5), &items, &events);

        assert_eq!(first, second);
    }

    #[test]
    fn test_serialized_view_shape() {
        let view = ScheduleComposer::default().compose_week(date(2026, 1, 5), &[], &[]);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["week_start"], "2026-01-05");
        assert_eq!(value["week_end"], "2026-01-11");
        assert_eq!(value["days"][0]["day_of_week"], 1);
        assert_eq!(value["days"][0]["items"], json!([]));
    }
}
