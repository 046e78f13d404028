//! Terminal rendering for timeledger types.
//!
//! Extension traits adding colored output with owo_colors.

use owo_colors::OwoColorize;
use timeledger_core::schedule::{DaySchedule, ItemKind, ItemStatus, ScheduleItem, WeekView};
use timeledger_core::timezone::TimeZonePolicy;
use timeledger_core::window::week_label;
use timeledger_core::EventInstance;

pub trait Render {
    fn render(&self) -> String;
}

/// Rendering that needs to know which wall clock to show.
pub trait RenderIn {
    fn render_in(&self, timezone: &TimeZonePolicy) -> String;
}

impl RenderIn for EventInstance {
    fn render_in(&self, timezone: &TimeZonePolicy) -> String {
        let time = if self.is_all_day {
            "all-day".to_string()
        } else {
            format!(
                "{}-{}",
                timezone.local(&self.start_at).format("%H:%M"),
                timezone.local(&self.end_at).format("%H:%M")
            )
        };

        format!("  {:>11} {} {}", time, self.title, format!("[{}]", self.id).dimmed())
    }
}

fn render_kind(kind: &ItemKind) -> String {
    match kind {
        ItemKind::ScheduleRule => "class".cyan().to_string(),
        ItemKind::PersonalEvent => "personal".magenta().to_string(),
        ItemKind::CenterSession => "session".blue().to_string(),
        ItemKind::Unknown(raw) => raw.to_lowercase().dimmed().to_string(),
    }
}

impl Render for ScheduleItem {
    fn render(&self) -> String {
        let time = format!("{}-{}", self.start_time, self.end_time);
        let title = match &self.status {
            Some(ItemStatus::PendingCancel) => self.title.yellow().to_string(),
            _ => self.title.clone(),
        };

        let mut line = format!("  {:>11} {} {}", time, title, render_kind(&self.kind()));

        if let Some(center) = &self.center_name {
            line.push_str(&format!(" {}", format!("@ {center}").dimmed()));
        }
        if let Some(ItemStatus::PendingCancel) = &self.status {
            line.push_str(&format!(" {}", "(pending cancel)".yellow()));
        }
        if self.is_cross_day_part {
            line.push_str(&format!(" {}", "(continues)".dimmed()));
        }

        line
    }
}

impl Render for DaySchedule {
    fn render(&self) -> String {
        let mut lines = vec![self.date.format("%a %b %-d").bold().to_string()];

        if self.items.is_empty() {
            lines.push(format!("  {}", "Nothing scheduled".dimmed()));
        } else {
            lines.extend(self.items.iter().map(Render::render));
        }

        lines.join("\n")
    }
}

impl Render for WeekView {
    fn render(&self) -> String {
        let header = format!(
            "{} {}",
            week_label(self.week_start).bold(),
            format!("({} items)", self.item_count()).dimmed()
        );

        let days: Vec<String> = self.days.iter().map(Render::render).collect();
        format!("{header}\n\n{}", days.join("\n\n"))
    }
}
