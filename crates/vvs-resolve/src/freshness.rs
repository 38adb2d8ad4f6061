//! "Touched time" of folders and items, used to decide whether a saved
//! session is newer than the inputs it was made from.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;
use vvs_core::{Folder, Item};

/// Metadata key the viewer stamps when a resource is opened.
pub const LAST_OPENED_KEY: &str = "lastOpened";
/// ISO-8601 UTC with fractional seconds, as written by the viewer.
pub const LAST_OPENED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Anything with creation/update times and free-form metadata.
pub trait Touched {
    fn meta(&self) -> &Map<String, Value>;
    fn created(&self) -> DateTime<Utc>;
    fn updated(&self) -> Option<DateTime<Utc>>;
}

impl Touched for Item {
    fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }
}

impl Touched for Folder {
    fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }
}

/// `meta.lastOpened`, else `updated`, else `created`.
///
/// An unparseable `lastOpened` is ignored with a warning.
pub fn touched_time<T: Touched + ?Sized>(doc: &T) -> DateTime<Utc> {
    let last_opened = doc
        .meta()
        .get(LAST_OPENED_KEY)
        .and_then(Value::as_str)
        .filter(|raw| !raw.is_empty());
    if let Some(raw) = last_opened {
        match NaiveDateTime::parse_from_str(raw, LAST_OPENED_FORMAT) {
            Ok(parsed) => return parsed.and_utc(),
            Err(e) => warn!(value = raw, error = %e, "Ignoring malformed lastOpened"),
        }
    }
    doc.updated().unwrap_or_else(|| doc.created())
}

/// Most recently touched document. Absent entries are skipped; on equal
/// times the earliest candidate wins.
pub fn newest_doc<T, I>(docs: I) -> Option<T>
where
    T: Touched,
    I: IntoIterator<Item = Option<T>>,
{
    let mut newest: Option<(DateTime<Utc>, T)> = None;
    for doc in docs.into_iter().flatten() {
        let touched = touched_time(&doc);
        match &newest {
            Some((best, _)) if touched <= *best => {}
            _ => newest = Some((touched, doc)),
        }
    }
    newest.map(|(_, doc)| doc)
}

/// `lastOpened` value for `at`, millisecond precision.
pub fn last_opened_value(at: DateTime<Utc>) -> Value {
    Value::String(at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}
