mod commands;
mod input;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use timeledger_core::config::TimeLedgerConfig;
use timeledger_core::{MonthEndPolicy, RecurrenceExpander, TimeZonePolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timeledger")]
#[command(about = "Expand recurring events and compose weekly class schedules")]
struct Cli {
    /// Wall clock for local dates: an offset like "+08:00" or an IANA zone (overrides config)
    #[arg(long, global = true)]
    timezone: Option<TimeZonePolicy>,

    /// Monthly rules on days a month lacks: "overflow" or "clamp" (overrides config)
    #[arg(long, global = true)]
    month_end: Option<MonthEndPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand personal events into occurrences within a window
    Expand {
        /// JSON file with an array of personal events
        #[arg(short, long)]
        events: PathBuf,

        /// Window start (YYYY-MM-DD for local midnight, or RFC 3339)
        #[arg(long)]
        from: String,

        /// Window end, inclusive. A bare date means that date's midnight
        #[arg(long)]
        to: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the next occurrence of each personal event
    Next {
        /// JSON file with an array of personal events
        #[arg(short, long)]
        events: PathBuf,

        /// Reference instant (defaults to now)
        #[arg(long)]
        after: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compose the week containing a date
    Week {
        /// Any date in the week (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// JSON file with server schedule items
        #[arg(long)]
        items: Option<PathBuf>,

        /// JSON file with personal events
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Weeks to move forward (negative for back)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check the recurrence rule of each personal event
    Validate {
        /// JSON file with an array of personal events
        #[arg(short, long)]
        events: PathBuf,
    },
    /// Show or change the configuration
    Config {
        /// Store a new default time zone
        #[arg(long)]
        set_timezone: Option<TimeZonePolicy>,

        /// Store a new default month-end policy
        #[arg(long)]
        set_month_end: Option<MonthEndPolicy>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = TimeLedgerConfig::config_path()?;
    let config = TimeLedgerConfig::load_or_create(&config_path)?;
    init_tracing(&config.log_level);

    run(cli, config, &config_path)
}

fn run(cli: Cli, config: TimeLedgerConfig, config_path: &Path) -> Result<()> {
    if let Commands::Config {
        set_timezone,
        set_month_end,
    } = cli.command
    {
        return commands::config::run(config, config_path, set_timezone, set_month_end);
    }

    let expander = expander_for(&config, cli.timezone, cli.month_end)?;

    match cli.command {
        Commands::Expand {
            events,
            from,
            to,
            json,
        } => commands::expand::run(&expander, &events, &from, &to, json),
        Commands::Next { events, after, json } => {
            commands::next::run(&expander, &events, after.as_deref(), json)
        }
        Commands::Week {
            date,
            items,
            events,
            offset,
            json,
        } => commands::week::run(
            &expander,
            date.as_deref(),
            items.as_deref(),
            events.as_deref(),
            offset,
            json,
        ),
        Commands::Validate { events } => commands::validate::run(&events),
        Commands::Config { .. } => Ok(()),
    }
}

/// Command-line flags win; the configured zone is only parsed when no flag replaces it.
fn expander_for(
    config: &TimeLedgerConfig,
    timezone: Option<TimeZonePolicy>,
    month_end: Option<MonthEndPolicy>,
) -> Result<RecurrenceExpander> {
    let timezone = match timezone {
        Some(timezone) => timezone,
        None => config.timezone_policy()?,
    };

    Ok(RecurrenceExpander::new(
        timezone,
        month_end.unwrap_or(config.month_end),
    ))
}

/// Log to stderr. `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_parse() {
        let cli = Cli::try_parse_from([
            "timeledger",
            "week",
            "--timezone",
            "Asia/Taipei",
            "--month-end",
            "clamp",
            "--offset",
            "-1",
        ])
        .unwrap();

        assert_eq!(
            cli.timezone.map(|tz| tz.to_string()).as_deref(),
            Some("Asia/Taipei")
        );
        assert_eq!(cli.month_end, Some(MonthEndPolicy::Clamp));
        assert!(matches!(cli.command, Commands::Week { offset: -1, .. }));
    }

    #[test]
    fn test_bad_timezone_rejected_at_parse_time() {
        let args = ["timeledger", "--timezone", "Atlantis", "validate", "-e", "x.json"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    fn broken_config() -> TimeLedgerConfig {
        TimeLedgerConfig {
            timezone: "Mars/Olympus".to_string(),
            ..TimeLedgerConfig::default()
        }
    }

    #[test]
    fn test_timezone_flag_bypasses_bad_configured_zone() {
        let config = broken_config();
        assert!(expander_for(&config, None, None).is_err());

        let utc: TimeZonePolicy = "UTC".parse().unwrap();
        let expander = expander_for(&config, Some(utc), Some(MonthEndPolicy::Clamp)).unwrap();
        assert_eq!(expander.timezone, utc);
        assert_eq!(expander.month_end, MonthEndPolicy::Clamp);
    }

    #[test]
    fn test_config_command_repairs_bad_configured_zone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cli = Cli::try_parse_from(["timeledger", "config", "--set-timezone", "UTC"]).unwrap();

        run(cli, broken_config(), &path).unwrap();

        let saved = TimeLedgerConfig::load_from(&path).unwrap();
        assert!(saved.timezone_policy().is_ok());
        assert_eq!(saved.timezone, "+00:00");
    }
}
