use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use serde_json::Value;
use tracing::{debug, info};

use crate::calendar::RawCalendarEntry;

const ENVELOPE_ITEMS_KEY: &str = "calendar_items";

/// Reads a saved calendars response: either a bare array of entries or the API envelope.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_feed(path: &Path) -> anyhow::Result<Vec<RawCalendarEntry>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let entries =
        parse_feed(&text).with_context(|| format!("failed parsing feed {}", path.display()))?;
    info!(entries = entries.len(), "loaded calendar feed");
    Ok(entries)
}

#[tracing::instrument(skip_all)]
pub fn parse_feed(text: &str) -> anyhow::Result<Vec<RawCalendarEntry>> {
    let document: Value = serde_json::from_str(text).context("feed is not valid JSON")?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(ENVELOPE_ITEMS_KEY) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(anyhow!(
                    "expected `{ENVELOPE_ITEMS_KEY}` to be an array, found {}",
                    json_kind(&other)
                ));
            }
            None => return Err(anyhow!("feed object has no `{ENVELOPE_ITEMS_KEY}` array")),
        },
        other => {
            return Err(anyhow!(
                "expected a feed array or object, found {}",
                json_kind(&other)
            ));
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let entry: RawCalendarEntry = serde_json::from_value(item)
            .with_context(|| format!("failed parsing calendar item {idx}"))?;
        out.push(entry);
    }

    debug!(count = out.len(), "parsed calendar items");
    Ok(out)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
