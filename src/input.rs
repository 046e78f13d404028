//! Reading the JSON inputs handed over by the API layer.
//!
//! A record that doesn't match the expected shape is skipped with a warning
//! instead of failing the whole file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use timeledger_core::RecurringEventSource;
use timeledger_core::schedule::ServerScheduleItem;

pub fn read_events(path: &Path) -> Result<Vec<RecurringEventSource>> {
    read_records(path, "personal event")
}

pub fn read_items(path: &Path) -> Result<Vec<ServerScheduleItem>> {
    read_records(path, "schedule item")
}

fn read_records<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let raw: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    let records = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    index,
                    error = %e,
                    "Skipping malformed {what}"
                );
                None
            }
        })
        .collect();

    Ok(records)
}
