use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;
use timeledger_core::timezone::format_instant;
use timeledger_core::{EventId, RecurrenceExpander};

use crate::input;

#[derive(Serialize)]
struct NextOccurrence<'a> {
    id: &'a EventId,
    title: &'a str,
    next: Option<String>,
}

pub fn run(
    expander: &RecurrenceExpander,
    events: &Path,
    after: Option<&str>,
    json: bool,
) -> Result<()> {
    let sources = input::read_events(events)?;
    let after = match after {
        Some(raw) => expander.timezone.parse_instant(raw)?,
        None => expander.timezone.to_policy_offset(&Utc::now().fixed_offset()),
    };

    let results: Vec<NextOccurrence> = sources
        .iter()
        .map(|source| NextOccurrence {
            id: &source.id,
            title: &source.title,
            next: expander
                .next_occurrence_after(source, &after)
                .map(|next| format_instant(&expander.timezone.to_policy_offset(&next))),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("{} {}", "Next after".dimmed(), format_instant(&after).dimmed());
    for result in &results {
        match &result.next {
            Some(next) => println!("  {} {}", next.green(), result.title),
            None => println!("  {} {}", "none".dimmed(), result.title.dimmed()),
        }
    }

    Ok(())
}
