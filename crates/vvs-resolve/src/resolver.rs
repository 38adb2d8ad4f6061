//! Decide what a folder, or a selection inside it, opens as.
//!
//! Saved sessions are items directly in the folder. A session saved for a
//! selection records it in `meta.linkedResources`; it stands in for that
//! selection as long as nothing selected was touched after it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;
use vvs_core::{AppError, Folder, Item, ResourceStore};

use crate::freshness::{newest_doc, touched_time};
use crate::listing::{FileRef, folder_files, item_files};
use crate::loadable::LoadableRules;
use crate::selection::SelectionSet;

/// A session item and its files.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSession {
    pub item: Item,
    pub files: Vec<FileRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A saved session stands in for the requested resources.
    Session(ResolvedSession),
    /// Loadable files, listed directly.
    Files(Vec<FileRef>),
}

impl Resolution {
    pub fn files(&self) -> &[FileRef] {
        match self {
            Self::Session(session) => &session.files,
            Self::Files(files) => files,
        }
    }

    pub fn into_files(self) -> Vec<FileRef> {
        match self {
            Self::Session(session) => session.files,
            Self::Files(files) => files,
        }
    }

    pub fn session(&self) -> Option<&Item> {
        match self {
            Self::Session(session) => Some(&session.item),
            Self::Files(_) => None,
        }
    }
}

/// Resolve the files that represent `folder_id`, or `selection` inside it.
///
/// An empty selection is treated as no selection.
pub fn resolve_files(
    store: &dyn ResourceStore,
    folder_id: &str,
    selection: Option<&SelectionSet>,
    rules: &LoadableRules,
) -> Result<Resolution> {
    require_folder(store, folder_id)?;
    let selection = selection.filter(|s| !s.is_empty());

    if let Some(session) = find_session(store, folder_id, selection, rules)? {
        return Ok(Resolution::Session(session));
    }

    let files = match selection {
        None => folder_files(store, folder_id)?,
        Some(selection) => selected_files(store, selection)?,
    };
    let loadable: Vec<FileRef> = files
        .into_iter()
        .filter(|file| rules.is_loadable(&file.path))
        .collect();
    debug!(folder = folder_id, files = loadable.len(), "Resolved loadable files");
    Ok(Resolution::Files(loadable))
}

/// Like [`resolve_files`] but only a session is an acceptable answer.
///
/// Fails with [`AppError::NotFound`] when no fresh session exists, or when
/// the session has no files.
pub fn resolve_session_download(
    store: &dyn ResourceStore,
    folder_id: &str,
    selection: Option<&SelectionSet>,
    rules: &LoadableRules,
) -> Result<ResolvedSession> {
    require_folder(store, folder_id)?;
    let selection = selection.filter(|s| !s.is_empty());
    match find_session(store, folder_id, selection, rules)? {
        Some(session) if !session.files.is_empty() => Ok(session),
        Some(session) => Err(AppError::not_found("Session file", &session.item.id).into()),
        None => Err(AppError::not_found("Session", folder_id).into()),
    }
}

fn require_folder(store: &dyn ResourceStore, folder_id: &str) -> Result<Folder> {
    store
        .folder(folder_id)?
        .ok_or_else(|| AppError::not_found("Folder", folder_id).into())
}

fn find_session(
    store: &dyn ResourceStore,
    folder_id: &str,
    selection: Option<&SelectionSet>,
    rules: &LoadableRules,
) -> Result<Option<ResolvedSession>> {
    let sessions = folder_sessions(store, folder_id, rules)?;

    let Some(selection) = selection else {
        return with_files(store, newest_doc(sessions.into_iter().map(Some)));
    };

    let selected_items = load_all(selection.items.iter(), |id| store.item(id))?;
    let selected_sessions = selected_items
        .iter()
        .flatten()
        .filter(|item| rules.is_session_item(item))
        .cloned()
        .map(Some);
    if let Some(session) = newest_doc(selected_sessions) {
        debug!(session = %session.id, "Selection contains a session");
        return with_files(store, Some(session));
    }

    let matching = sessions
        .into_iter()
        .filter(|session| selection.matches(session))
        .map(Some);
    let Some(session) = newest_doc(matching) else {
        return Ok(None);
    };

    let selected_folders = load_all(selection.folders.iter(), |id| store.folder(id))?;
    let newest_input = newest_touch(&selected_items, &selected_folders);
    let session_time = touched_time(&session);
    if let Some(input_time) = newest_input
        && session_time < input_time
    {
        debug!(
            session = %session.id,
            %session_time,
            %input_time,
            "Matching session is older than its inputs"
        );
        return Ok(None);
    }
    with_files(store, Some(session))
}

fn folder_sessions(
    store: &dyn ResourceStore,
    folder_id: &str,
    rules: &LoadableRules,
) -> Result<Vec<Item>> {
    Ok(store
        .child_items(folder_id)?
        .into_iter()
        .filter(|item| rules.is_session_item(item))
        .collect())
}

fn with_files(store: &dyn ResourceStore, session: Option<Item>) -> Result<Option<ResolvedSession>> {
    let Some(item) = session else {
        return Ok(None);
    };
    let files = item_files(store, &item)?;
    Ok(Some(ResolvedSession { item, files }))
}

fn load_all<'a, T>(
    ids: impl Iterator<Item = &'a String>,
    load: impl Fn(&str) -> Result<Option<T>>,
) -> Result<Vec<Option<T>>> {
    ids.map(|id| load(id)).collect()
}

fn newest_touch(items: &[Option<Item>], folders: &[Option<Folder>]) -> Option<DateTime<Utc>> {
    let item_times = items.iter().flatten().map(touched_time);
    let folder_times = folders.iter().flatten().map(touched_time);
    item_times.chain(folder_times).max()
}

fn selected_files(store: &dyn ResourceStore, selection: &SelectionSet) -> Result<Vec<FileRef>> {
    let mut files = Vec::new();
    for folder_id in &selection.folders {
        match store.folder(folder_id)? {
            Some(folder) => files.extend(folder_files(store, &folder.id)?),
            None => debug!(folder = %folder_id, "Skipping missing selected folder"),
        }
    }
    for item_id in &selection.items {
        match store.item(item_id)? {
            Some(item) => files.extend(item_files(store, &item)?),
            None => debug!(item = %item_id, "Skipping missing selected item"),
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
