use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use vvs_config::Settings;
use vvs_core::MemoryStore;
use vvs_resolve::{LoadableRules, SelectionSet};

pub(crate) fn load_tree(path: &Path) -> Result<MemoryStore> {
    MemoryStore::load(path)
}

/// Read a JSON array input file such as annotations or label maps.
pub(crate) fn load_json_list<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input: {}", path.display()))
}

pub(crate) fn loadable_rules(settings: &Settings) -> LoadableRules {
    LoadableRules::new(
        settings.sessions.extensions.clone(),
        settings.config.file_name.clone(),
    )
}

pub(crate) fn selection(folders: &str, items: &str) -> Option<SelectionSet> {
    let selection = SelectionSet::from_id_strings(folders, items);
    (!selection.is_empty()).then_some(selection)
}
