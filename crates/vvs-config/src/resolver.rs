//! Effective viewer configuration for a folder.

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};
use vvs_core::{Folder, ResourceStore, User};

use crate::access::apply_user_context;
use crate::document::{Document, INHERIT_KEY, flag_set, parse_document};
use crate::hierarchy::HierarchyLevels;
use crate::merge::{merge_documents, strip_markers};
use crate::settings::ConfigSettings;

/// Resolve the config document named `file_name` for `start_folder`.
///
/// The first level holding a readable document answers, unless that
/// document sets `__inherit__: true`; it is then kept as an accumulator
/// that wins over whatever the levels above provide. When every level is
/// exhausted the accumulator, if any, is returned. A non-mapping document
/// ends the walk and is returned unmerged. `__all__` markers never reach
/// the result.
pub fn resolve_config(
    store: &dyn ResourceStore,
    start_folder: &str,
    file_name: &str,
    user: Option<&User>,
    settings: &ConfigSettings,
) -> Result<Option<Document>> {
    let levels = HierarchyLevels::new(
        store,
        start_folder,
        &settings.container_name,
        settings.fallback_folder.as_deref(),
    );

    let mut accumulator: Option<Document> = None;
    for level in levels {
        let folder = level?;
        let Some(parsed) = load_level(store, &folder, file_name, settings.max_size_bytes)? else {
            continue;
        };
        let parsed = apply_user_context(parsed, user);
        if !parsed.is_object() {
            debug!(folder = %folder.id, "Resolved non-mapping config");
            return Ok(Some(strip_markers(parsed)));
        }
        let mut doc = match accumulator.take() {
            Some(deeper) => merge_documents(parsed, deeper),
            None => parsed,
        };

        let inherit = flag_set(&doc, INHERIT_KEY);
        if let Value::Object(map) = &mut doc {
            map.remove(INHERIT_KEY);
        }
        if !inherit {
            debug!(folder = %folder.id, "Resolved config");
            return Ok(Some(strip_markers(doc)));
        }
        debug!(folder = %folder.id, "Config inherits from the level above");
        accumulator = Some(doc);
    }
    Ok(accumulator.map(strip_markers))
}

/// The parsed config document stored directly in `folder`, if any.
/// The config item's files are tried in order; oversized and malformed
/// ones are skipped.
fn load_level(
    store: &dyn ResourceStore,
    folder: &Folder,
    file_name: &str,
    max_size_bytes: u64,
) -> Result<Option<Document>> {
    let Some(item) = store
        .child_items(&folder.id)?
        .into_iter()
        .find(|item| item.name == file_name)
    else {
        return Ok(None);
    };
    let files = store.item_files(&item.id)?;
    if files.is_empty() {
        debug!(item = %item.id, "Config item has no file");
        return Ok(None);
    }

    for file in files {
        if file.size > max_size_bytes {
            warn!(
                file = %file.id,
                size = file.size,
                limit = max_size_bytes,
                "Skipping oversized config file"
            );
            continue;
        }
        let bytes = store.read_file(&file)?;
        if bytes.len() as u64 > max_size_bytes {
            warn!(file = %file.id, size = bytes.len(), "Skipping oversized config file");
            continue;
        }
        match parse_document(&bytes) {
            Ok(doc) => return Ok(Some(doc)),
            Err(e) => {
                warn!(file = %file.id, folder = %folder.id, error = %format!("{e:#}"), "Skipping malformed config file");
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
