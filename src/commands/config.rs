use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use timeledger_core::config::TimeLedgerConfig;
use timeledger_core::{MonthEndPolicy, TimeZonePolicy};

pub fn run(
    mut config: TimeLedgerConfig,
    path: &Path,
    set_timezone: Option<TimeZonePolicy>,
    set_month_end: Option<MonthEndPolicy>,
) -> Result<()> {
    let changed = set_timezone.is_some() || set_month_end.is_some();

    if let Some(timezone) = set_timezone {
        config.timezone = timezone.to_string();
    }
    if let Some(month_end) = set_month_end {
        config.month_end = month_end;
    }
    if changed {
        config.save_to(path)?;
    }

    println!("{}", path.display().dimmed());
    println!("  timezone  = {}", config.timezone);
    println!("  month_end = {}", config.month_end);
    println!("  log_level = {}", config.log_level);

    Ok(())
}
