//! Selection sets: which folders and items a session was opened for.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use vvs_core::Item;

use crate::freshness::{LAST_OPENED_KEY, last_opened_value};

/// Metadata key recording the selection a session was saved for.
pub const LINKED_RESOURCES_KEY: &str = "linkedResources";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    #[serde(default)]
    pub folders: BTreeSet<String>,
    #[serde(default)]
    pub items: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new<F, I>(folders: F, items: I) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from comma-separated id strings, as passed on a query string.
    pub fn from_id_strings(folders: &str, items: &str) -> Self {
        Self::new(parse_id_list(folders), parse_id_list(items))
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.items.is_empty()
    }

    pub fn matches(&self, candidate: &Item) -> bool {
        matches_selection_set(&self.folders, &self.items, candidate)
    }
}

/// Split a comma-separated id list. Blank entries are dropped, so `""`
/// yields an empty list.
pub fn parse_id_list(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Selection recorded on a session item. Missing or malformed metadata is
/// read as an empty selection; non-string ids are ignored.
pub fn linked_resources(item: &Item) -> SelectionSet {
    let Some(linked) = item.meta.get(LINKED_RESOURCES_KEY).and_then(Value::as_object) else {
        return SelectionSet::default();
    };
    let ids = |key: &str| -> BTreeSet<String> {
        linked
            .get(key)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };
    SelectionSet {
        folders: ids("folders"),
        items: ids("items"),
    }
}

/// Set equality between the requested selection and the one recorded on
/// `candidate`. Order and duplicates do not matter.
pub fn matches_selection_set(
    folders: &BTreeSet<String>,
    items: &BTreeSet<String>,
    candidate: &Item,
) -> bool {
    let recorded = linked_resources(candidate);
    recorded.folders == *folders && recorded.items == *items
}

/// `linkedResources` value for a selection.
pub fn linked_resources_meta(selection: &SelectionSet) -> Value {
    json!({
        "folders": selection.folders,
        "items": selection.items,
    })
}

/// Metadata to stamp on a newly saved session item.
pub fn session_meta(selection: &SelectionSet, opened_at: DateTime<Utc>) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert(LINKED_RESOURCES_KEY.into(), linked_resources_meta(selection));
    meta.insert(LAST_OPENED_KEY.into(), last_opened_value(opened_at));
    meta
}
