use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use timeledger_core::RecurrenceExpander;

use crate::input;
use crate::render::RenderIn;

pub fn run(
    expander: &RecurrenceExpander,
    events: &Path,
    from: &str,
    to: &str,
    json: bool,
) -> Result<()> {
    let sources = input::read_events(events)?;
    let range_start = expander.timezone.parse_instant(from)?;
    let range_end = expander.timezone.parse_instant(to)?;

    let instances = expander.expand_many(&sources, &range_start, &range_end);

    if json {
        println!("{}", serde_json::to_string_pretty(&instances)?);
        return Ok(());
    }

    if instances.is_empty() {
        println!("{}", "No occurrences in range".dimmed());
        return Ok(());
    }

    // Grouped by local date in expansion order; sources are not interleaved
    let mut current_date = None;

    for instance in &instances {
        let date = expander.timezone.local_date(&instance.start_at);

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %b %-d, %Y").bold());
            current_date = Some(date);
        }

        println!("{}", instance.render_in(&expander.timezone));
    }

    Ok(())
}
