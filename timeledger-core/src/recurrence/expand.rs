//! Expansion of recurring events into concrete occurrences within a window.

use chrono::{DateTime, Duration, FixedOffset};
use tracing::trace;

use super::rule::{Cadence, RecurrenceRule};
use super::walk::{MonthEndPolicy, Walk};
use crate::constants::DATE_FORMAT;
use crate::event::{EventInstance, RecurringEventSource};
use crate::timezone::TimeZonePolicy;

/// Stateless expander; the policies only decide how wall-clock time is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurrenceExpander {
    pub timezone: TimeZonePolicy,
    pub month_end: MonthEndPolicy,
}

impl RecurrenceExpander {
    pub fn new(timezone: TimeZonePolicy, month_end: MonthEndPolicy) -> Self {
        RecurrenceExpander { timezone, month_end }
    }

    /// Expand a single source into occurrences within `[range_start, range_end]`.
    ///
    /// - A source without a rule comes back as itself, whether or not it falls in range.
    /// - Both bounds are inclusive and compared as instants: an occurrence at
    ///   exactly `range_end` is kept, one a second later is not. Passing midnight
    ///   as `range_end` therefore drops later occurrences on that day.
    /// - An invalid rule yields no occurrences.
    pub fn expand_one(
        &self,
        source: &RecurringEventSource,
        range_start: &DateTime<FixedOffset>,
        range_end: &DateTime<FixedOffset>,
    ) -> Vec<EventInstance> {
        let Some(rule) = &source.recurrence_rule else {
            return vec![source.as_single_instance()];
        };

        let Some(cadence) = rule.cadence() else {
            trace!(
                id = %source.id,
                frequency = %rule.frequency,
                "Skipping invalid recurrence rule"
            );
            return Vec::new();
        };

        let duration = source.duration();
        let mut instances = Vec::new();

        for position in self.positions(source, rule, cadence) {
            if position > *range_end {
                break;
            }
            if position >= *range_start {
                instances.push(self.instance_at(source, position, duration));
            }
        }

        instances
    }

    /// Expand every source in input order. No sorting or de-duplication.
    pub fn expand_many(
        &self,
        sources: &[RecurringEventSource],
        range_start: &DateTime<FixedOffset>,
        range_end: &DateTime<FixedOffset>,
    ) -> Vec<EventInstance> {
        sources
            .iter()
            .flat_map(|source| self.expand_one(source, range_start, range_end))
            .collect()
    }

    /// First occurrence strictly after `after`.
    ///
    /// A source that hasn't started yet returns its own start. `None` when the
    /// rule is missing or invalid, or its `count`/`until` runs out first.
    pub fn next_occurrence_after(
        &self,
        source: &RecurringEventSource,
        after: &DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        if source.start_at > *after {
            return Some(source.start_at);
        }

        let rule = source.recurrence_rule.as_ref()?;
        let cadence = rule.cadence()?;

        self.positions(source, rule, cadence)
            .find(|position| position > after)
    }

    /// Occurrence instants of a valid rule, honoring its bounds.
    fn positions(
        &self,
        source: &RecurringEventSource,
        rule: &RecurrenceRule,
        cadence: Cadence,
    ) -> impl Iterator<Item = DateTime<FixedOffset>> {
        let anchor = self.timezone.local(&source.start_at);
        let last_date = rule.last_date();
        let limit = rule.count.map_or(usize::MAX, |count| count as usize);

        Walk::new(anchor, cadence, self.month_end)
            .take(limit)
            .take_while(move |local| last_date.is_none_or(|last| local.date() <= last))
            .map_while(move |local| self.timezone.resolve(local))
    }

    fn instance_at(
        &self,
        source: &RecurringEventSource,
        start: DateTime<FixedOffset>,
        duration: Duration,
    ) -> EventInstance {
        let local_date = self.timezone.local_date(&start);

        EventInstance {
            id: format!("{}_{}", source.id, local_date.format(DATE_FORMAT)),
            original_id: source.id.clone(),
            title: source.title.clone(),
            start_at: start,
            end_at: start + duration,
            is_all_day: source.is_all_day,
            color_hex: source.color_hex.clone(),
        }
    }
}
