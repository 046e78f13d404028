/// Display color forced onto items awaiting cancellation (amber).
pub const PENDING_CANCEL_COLOR: &str = "#F59E0B";

/// Wall-clock offset every stored instant is written in unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "+08:00";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Serialized form of an instant: local wall clock plus its offset.
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of `start_time` / `end_time` on schedule items.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

pub const DAYS_PER_WEEK: i64 = 7;
