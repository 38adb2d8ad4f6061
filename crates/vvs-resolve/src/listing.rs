//! Flattened file listings of folders and items.

use std::collections::HashSet;

use anyhow::Result;
use tracing::warn;
use vvs_core::{FileEntry, Item, ParentRef, ResourceStore};

/// A file together with the item that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRef {
    pub item: Item,
    pub file: FileEntry,
    /// Path relative to the listed root, e.g. `series1/IM0001.dcm`.
    pub path: String,
}

impl FileRef {
    /// Name of the underlying file.
    pub fn name(&self) -> &str {
        &self.file.name
    }
}

/// Files of one item. A single file named like its item is listed under
/// its own name; otherwise files are nested under the item name.
pub fn item_files(store: &dyn ResourceStore, item: &Item) -> Result<Vec<FileRef>> {
    item_files_under(store, item, "")
}

/// Every file under `folder_id`, descending into sub-folders.
pub fn folder_files(store: &dyn ResourceStore, folder_id: &str) -> Result<Vec<FileRef>> {
    let mut files = Vec::new();
    let mut visited = HashSet::new();
    collect_folder(store, folder_id, "", &mut visited, &mut files)?;
    Ok(files)
}

fn collect_folder(
    store: &dyn ResourceStore,
    folder_id: &str,
    prefix: &str,
    visited: &mut HashSet<String>,
    out: &mut Vec<FileRef>,
) -> Result<()> {
    if !visited.insert(folder_id.to_string()) {
        warn!(folder = folder_id, "Folder cycle detected; skipping");
        return Ok(());
    }
    for item in store.child_items(folder_id)? {
        out.extend(item_files_under(store, &item, prefix)?);
    }
    for child in store.child_folders(&ParentRef::Folder(folder_id.to_string()))? {
        let child_prefix = format!("{prefix}{}/", child.name);
        collect_folder(store, &child.id, &child_prefix, visited, out)?;
    }
    Ok(())
}

fn item_files_under(store: &dyn ResourceStore, item: &Item, prefix: &str) -> Result<Vec<FileRef>> {
    let files = store.item_files(&item.id)?;
    let flat = files.len() == 1 && files[0].name == item.name;
    Ok(files
        .into_iter()
        .map(|file| {
            let path = if flat {
                format!("{prefix}{}", file.name)
            } else {
                format!("{prefix}{}/{}", item.name, file.name)
            };
            FileRef {
                item: item.clone(),
                file,
                path,
            }
        })
        .collect())
}
