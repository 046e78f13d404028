use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::input;

pub fn run(events: &Path) -> Result<()> {
    let sources = input::read_events(events)?;
    let mut invalid = 0;

    for source in &sources {
        let Some(rule) = &source.recurrence_rule else {
            println!("  {} {} {}", "·".dimmed(), source.title, "(single)".dimmed());
            continue;
        };

        if rule.is_valid() {
            println!("  {} {} {}", "✓".green(), source.title, rule.label().dimmed());
        } else {
            invalid += 1;
            let interval = match rule.interval {
                None => "default".to_string(),
                Some(None) => "null".to_string(),
                Some(Some(raw)) => raw.to_string(),
            };
            println!(
                "  {} {} {}",
                "✗".red(),
                source.title,
                format!("(frequency {}, interval {interval})", rule.frequency).red()
            );
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} invalid recurrence rule(s) in {}", events.display());
    }

    Ok(())
}
