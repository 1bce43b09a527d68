//! Data source collaborators: the seed loader and the live subscription.
//!
//! Both sources hand complete record lists to the core. Loading problems are
//! reported here and never reach the reconciler.

mod live;
mod seed;
mod subscription;

pub use live::{LiveFeed, LiveSource, PollingFileLiveSource, UpdateCallback};
pub use seed::{FileSeedLoader, HttpSeedLoader, SeedLoader, StaticSeedLoader};
pub use subscription::Subscription;

use crate::catalog::Record;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while fetching or decoding a record list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Decodes a JSON array of records.
///
/// Entries that are not JSON objects are skipped with a warning. Objects
/// always decode, whatever the shape of their fields.
pub fn parse_records_json(content: &str) -> Result<Vec<Record>, SourceError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => return Err(SourceError::NotAnArray(json_kind(&other))),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (index, item) in items.into_iter().enumerate() {
        match item {
            serde_json::Value::Object(object) => records.push(Record::from(object)),
            other => {
                debug!("Entry {} is {}, not a record", index, json_kind(&other));
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} entries that are not records", skipped);
    }
    Ok(records)
}
