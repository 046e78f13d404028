//! Error types for timeledger.
//!
//! Expansion and composition never fail; these cover the edges around them
//! (configuration, time-zone names, input files).

use thiserror::Error;

/// Errors that can occur outside the pure scheduling engine.
#[derive(Error, Debug)]
pub enum TimeLedgerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("Invalid date or time '{0}'. Expected YYYY-MM-DD or RFC 3339")]
    InvalidDateTime(String),

    #[error("Unknown month-end policy '{0}'. Expected 'overflow' or 'clamp'")]
    UnknownMonthEndPolicy(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for timeledger operations.
pub type TimeLedgerResult<T> = Result<T, TimeLedgerError>;
