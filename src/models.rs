//! Deadline Models
//!
//! Data structures matching the `DEADLINES.json` document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One deadline entry as published in the document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    /// ISO-like date string, kept raw so bad values can still be shown
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
}

#[cfg(test)]
impl Deadline {
    pub fn new(name: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: Some(time.into()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Deadline {
    /// Time string with `None` for both a missing and a blank field
    pub fn time_str(&self) -> Option<&str> {
        self.time.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Whole document, always replaced wholesale on every poll
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeadlinesDocument {
    #[serde(default, deserialize_with = "lenient_records")]
    pub deadlines: Vec<Deadline>,
}

impl DeadlinesDocument {
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}

// One malformed record must not take the whole document down with it.

/// Any JSON scalar as text; numbers and booleans keep their JSON spelling
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

/// Records that are not objects are skipped with a warning
fn lenient_records<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Deadline>, D::Error> {
    let records = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Deadline>(record) {
            Ok(deadline) => Some(deadline),
            Err(e) => {
                log::warn!("[DEADLINES] Skipping malformed record: {}", e);
                None
            }
        })
        .collect())
}
