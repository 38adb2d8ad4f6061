//! The sequence of folders consulted when resolving a config file.

use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;
use vvs_core::{Folder, ParentRef, ResourceStore};

enum Phase {
    /// Walking parent links; the next folder to load.
    Walk(String),
    /// The root folder was reached; look for the container under its owner.
    Container(ParentRef),
    Fallback,
    Done,
}

/// Iterator over config levels: the start folder, its ancestors, the
/// container folder next to the root under the same owner, then the
/// fallback folder. No folder is yielded twice and the fallback is always
/// the last level.
pub struct HierarchyLevels<'a> {
    store: &'a dyn ResourceStore,
    container_name: &'a str,
    fallback: Option<&'a str>,
    phase: Phase,
    visited: HashSet<String>,
}

impl<'a> HierarchyLevels<'a> {
    pub fn new(
        store: &'a dyn ResourceStore,
        start_folder: &str,
        container_name: &'a str,
        fallback: Option<&'a str>,
    ) -> Self {
        Self {
            store,
            container_name,
            fallback,
            phase: Phase::Walk(start_folder.to_string()),
            visited: HashSet::new(),
        }
    }

    fn advance(&mut self) -> Result<Option<Folder>> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Done => return Ok(None),
                Phase::Walk(id) => {
                    let Some(folder) = self.store.folder(&id)? else {
                        debug!(folder = %id, "Folder missing; skipping to fallback");
                        self.phase = Phase::Fallback;
                        continue;
                    };
                    if !self.visited.insert(folder.id.clone()) {
                        debug!(folder = %folder.id, "Folder cycle; skipping to fallback");
                        self.phase = Phase::Fallback;
                        continue;
                    }
                    self.phase = match folder.parent.folder_id() {
                        Some(parent) => Phase::Walk(parent.to_string()),
                        None => Phase::Container(folder.parent.clone()),
                    };
                    return Ok(Some(folder));
                }
                Phase::Container(owner) => {
                    self.phase = Phase::Fallback;
                    let container = self
                        .store
                        .child_folders(&owner)?
                        .into_iter()
                        .find(|f| f.name == self.container_name);
                    if let Some(folder) = container
                        && self.visited.insert(folder.id.clone())
                    {
                        return Ok(Some(folder));
                    }
                }
                Phase::Fallback => {
                    let Some(id) = self.fallback.take() else {
                        return Ok(None);
                    };
                    return Ok(self
                        .store
                        .folder(id)?
                        .filter(|folder| self.visited.insert(folder.id.clone())));
                }
            }
        }
    }
}

impl Iterator for HierarchyLevels<'_> {
    type Item = Result<Folder>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(folder) => folder.map(Ok),
            Err(e) => {
                self.phase = Phase::Done;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vvs_core::MemoryStore;

    fn folder(store: &mut MemoryStore, id: &str, name: &str, parent: ParentRef) {
        store.insert_folder(Folder::new(id, name, parent, Utc::now()));
    }

    fn tree() -> MemoryStore {
        let mut store = MemoryStore::new();
        let coll = ParentRef::Collection("c1".into());
        folder(&mut store, "root", "Data", coll.clone());
        folder(&mut store, "cfg", ".config", coll);
        folder(&mut store, "mid", "Study", ParentRef::Folder("root".into()));
        folder(&mut store, "leaf", "Series", ParentRef::Folder("mid".into()));
        folder(&mut store, "shared", "Shared", ParentRef::User("admin".into()));
        store
    }

    fn ids(levels: HierarchyLevels<'_>) -> Vec<String> {
        levels.map(|level| level.unwrap().id).collect()
    }

    #[test]
    fn test_walks_up_then_container_then_fallback() {
        let store = tree();
        let levels = HierarchyLevels::new(&store, "leaf", ".config", Some("shared"));
        assert_eq!(ids(levels), vec!["leaf", "mid", "root", "cfg", "shared"]);
    }

    #[test]
    fn test_no_container_no_fallback() {
        let store = tree();
        let levels = HierarchyLevels::new(&store, "mid", ".settings", None);
        assert_eq!(ids(levels), vec!["mid", "root"]);
    }

    #[test]
    fn test_start_in_container_is_not_revisited() {
        let store = tree();
        let levels = HierarchyLevels::new(&store, "cfg", ".config", Some("shared"));
        assert_eq!(ids(levels), vec!["cfg", "shared"]);
    }

    #[test]
    fn test_fallback_already_visited_is_skipped() {
        let store = tree();
        let levels = HierarchyLevels::new(&store, "leaf", ".config", Some("mid"));
        assert_eq!(ids(levels), vec!["leaf", "mid", "root", "cfg"]);
    }

    #[test]
    fn test_missing_start_goes_to_fallback() {
        let store = tree();
        let levels = HierarchyLevels::new(&store, "gone", ".config", Some("shared"));
        assert_eq!(ids(levels), vec!["shared"]);
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut store = tree();
        folder(&mut store, "a", "A", ParentRef::Folder("b".into()));
        folder(&mut store, "b", "B", ParentRef::Folder("a".into()));
        let levels = HierarchyLevels::new(&store, "a", ".config", Some("shared"));
        assert_eq!(ids(levels), vec!["a", "b", "shared"]);
    }
}
