use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use timeledger_core::constants::DATE_FORMAT;
use timeledger_core::window::{shift_week, week_start_of};
use timeledger_core::{RecurrenceExpander, ScheduleComposer};

use crate::input;
use crate::render::Render;

pub fn run(
    expander: &RecurrenceExpander,
    date: Option<&str>,
    items: Option<&Path>,
    events: Option<&Path>,
    offset: i64,
    json: bool,
) -> Result<()> {
    let anchor = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .with_context(|| format!("Invalid date '{raw}'. Expected YYYY-MM-DD"))?,
        None => expander.timezone.today(),
    };

    let week_start = shift_week(week_start_of(anchor), offset)
        .with_context(|| format!("Week offset {offset} is out of range"))?;

    let server_items = match items {
        Some(path) => input::read_items(path)?,
        None => Vec::new(),
    };
    let personal_events = match events {
        Some(path) => input::read_events(path)?,
        None => Vec::new(),
    };

    let view = ScheduleComposer::new(*expander).compose_week(
        week_start,
        &server_items,
        &personal_events,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view.render());
    }

    Ok(())
}
