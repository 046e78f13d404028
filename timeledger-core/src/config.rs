//! User configuration at ~/.config/timeledger/config.toml.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_TIMEZONE};
use crate::error::{TimeLedgerError, TimeLedgerResult};
use crate::recurrence::{MonthEndPolicy, RecurrenceExpander};
use crate::timezone::TimeZonePolicy;

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLedgerConfig {
    /// Wall clock used for local dates: an offset such as "+08:00" or an IANA name.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub month_end: MonthEndPolicy,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TimeLedgerConfig {
    fn default() -> Self {
        TimeLedgerConfig {
            timezone: default_timezone(),
            month_end: MonthEndPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# timeledger configuration. Every key may also be set through TIMELEDGER_<KEY>.

# Wall clock for local dates, as an offset or an IANA zone name:
# timezone = \"+08:00\"

# Monthly rules on days a month lacks:
#   \"overflow\" steps Jan 31 -> Mar 3, \"clamp\" steps Jan 31 -> Feb 28
# month_end = \"overflow\"

# Log filter when RUST_LOG is unset:
# log_level = \"warn\"
";

impl TimeLedgerConfig {
    /// `<config dir>/timeledger/config.toml`.
    pub fn config_path() -> TimeLedgerResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("timeledger").join("config.toml"))
            .ok_or_else(|| TimeLedgerError::Config("Could not determine config directory".into()))
    }

    /// Load `path`, writing the commented template there first if it is missing.
    pub fn load_or_create(path: &Path) -> TimeLedgerResult<Self> {
        if !path.exists() {
            write_creating_parent(path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Self::load_from(path)
    }

    /// Load from `path` (optional) with `TIMELEDGER_*` environment overrides.
    pub fn load_from(path: &Path) -> TimeLedgerResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TIMELEDGER"))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| TimeLedgerError::Config(e.to_string()))
    }

    pub fn timezone_policy(&self) -> TimeLedgerResult<TimeZonePolicy> {
        self.timezone.parse()
    }

    pub fn expander(&self) -> TimeLedgerResult<RecurrenceExpander> {
        Ok(RecurrenceExpander::new(self.timezone_policy()?, self.month_end))
    }

    /// Persist every key to `path`, replacing the template comments.
    pub fn save_to(&self, path: &Path) -> TimeLedgerResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| TimeLedgerError::Config(e.to_string()))?;

        write_creating_parent(path, &content)
    }
}

fn write_creating_parent(path: &Path, content: &str) -> TimeLedgerResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
