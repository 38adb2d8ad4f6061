//! Builder inputs for items and folders.

use anyhow::Result;
use tracing::debug;
use vvs_core::{AppError, Item, ResourceStore};
use vvs_manifest::DataSourceInput;

use crate::listing::item_files;
use crate::loadable::LoadableRules;
use crate::urls::file_download_url;

/// Loadable files of one item as data sources.
pub fn item_sources(
    store: &dyn ResourceStore,
    item_id: &str,
    api_root: &str,
    rules: &LoadableRules,
) -> Result<Vec<DataSourceInput>> {
    let item = store
        .item(item_id)?
        .ok_or_else(|| AppError::not_found("Item", item_id))?;
    sources_of(store, &item, api_root, rules)
}

/// Data sources for a folder.
///
/// With explicit `item_ids` or `folder_ids`, those items plus the direct
/// items of those folders are used. Otherwise every direct item of
/// `folder_id` is used. Missing ids are skipped.
pub fn folder_sources(
    store: &dyn ResourceStore,
    folder_id: &str,
    item_ids: &[String],
    folder_ids: &[String],
    api_root: &str,
    rules: &LoadableRules,
) -> Result<Vec<DataSourceInput>> {
    let mut items: Vec<Item> = Vec::new();
    if item_ids.is_empty() && folder_ids.is_empty() {
        if store.folder(folder_id)?.is_none() {
            return Err(AppError::not_found("Folder", folder_id).into());
        }
        items.extend(store.child_items(folder_id)?);
    } else {
        for id in item_ids {
            match store.item(id)? {
                Some(item) => items.push(item),
                None => debug!(item = %id, "Skipping missing item"),
            }
        }
        for id in folder_ids {
            items.extend(store.child_items(id)?);
        }
    }

    let mut sources = Vec::new();
    for item in &items {
        sources.extend(sources_of(store, item, api_root, rules)?);
    }
    debug!(folder = folder_id, items = items.len(), sources = sources.len(), "Collected folder sources");
    Ok(sources)
}

fn sources_of(
    store: &dyn ResourceStore,
    item: &Item,
    api_root: &str,
    rules: &LoadableRules,
) -> Result<Vec<DataSourceInput>> {
    Ok(item_files(store, item)?
        .into_iter()
        .filter(|file| rules.is_loadable(&file.file.name))
        .map(|file| DataSourceInput {
            url: file_download_url(api_root, &file.file.id, &file.file.name),
            name: Some(file.file.name.clone()),
            file_id: Some(file.file.id),
        })
        .collect())
}
