//! Storage seam for the resolvers, plus an in-memory implementation backed by
//! a JSON snapshot of a resource tree.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resource::{FileEntry, Folder, Item, ParentRef, User};

/// Read access to a resource tree.
///
/// Lookups of missing ids return `Ok(None)` / empty lists; errors are
/// reserved for backend failures.
pub trait ResourceStore {
    fn folder(&self, id: &str) -> Result<Option<Folder>>;

    fn item(&self, id: &str) -> Result<Option<Item>>;

    /// Folders owned directly by `parent`, in storage order.
    fn child_folders(&self, parent: &ParentRef) -> Result<Vec<Folder>>;

    /// Items directly inside `folder_id`, in storage order.
    fn child_items(&self, folder_id: &str) -> Result<Vec<Item>>;

    fn item_files(&self, item_id: &str) -> Result<Vec<FileEntry>>;

    /// Full content of a file. Callers check `FileEntry::size` first.
    fn read_file(&self, file: &FileEntry) -> Result<Vec<u8>>;

    fn user(&self, login: &str) -> Result<Option<User>>;
}

/// A file plus its inline content, as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(flatten)]
    pub entry: FileEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Serialized form of a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub files: Vec<StoredFile>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    folders: Vec<Folder>,
    items: Vec<Item>,
    files: Vec<FileEntry>,
    contents: HashMap<String, Vec<u8>>,
    users: Vec<User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resource snapshot: {}", path.display()))?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse resource snapshot: {}", path.display()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self {
            folders: snapshot.folders,
            items: snapshot.items,
            users: snapshot.users,
            ..Self::default()
        };
        for stored in snapshot.files {
            store.insert_file(stored.entry, stored.content.map(String::into_bytes));
        }
        store
    }

    pub fn insert_folder(&mut self, folder: Folder) {
        self.folders.retain(|f| f.id != folder.id);
        self.folders.push(folder);
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.retain(|i| i.id != item.id);
        self.items.push(item);
    }

    /// Insert a file. When content is given and the declared size is zero,
    /// the size is taken from the content.
    pub fn insert_file(&mut self, mut file: FileEntry, content: Option<Vec<u8>>) {
        self.files.retain(|f| f.id != file.id);
        if let Some(bytes) = content {
            if file.size == 0 {
                file.size = bytes.len() as u64;
            }
            self.contents.insert(file.id.clone(), bytes);
        }
        self.files.push(file);
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.retain(|u| u.login != user.login);
        self.users.push(user);
    }
}

impl ResourceStore for MemoryStore {
    fn folder(&self, id: &str) -> Result<Option<Folder>> {
        Ok(self.folders.iter().find(|f| f.id == id).cloned())
    }

    fn item(&self, id: &str) -> Result<Option<Item>> {
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    fn child_folders(&self, parent: &ParentRef) -> Result<Vec<Folder>> {
        Ok(self
            .folders
            .iter()
            .filter(|f| &f.parent == parent)
            .cloned()
            .collect())
    }

    fn child_items(&self, folder_id: &str) -> Result<Vec<Item>> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.folder_id == folder_id)
            .cloned()
            .collect())
    }

    fn item_files(&self, item_id: &str) -> Result<Vec<FileEntry>> {
        Ok(self
            .files
            .iter()
            .filter(|f| f.item_id == item_id)
            .cloned()
            .collect())
    }

    fn read_file(&self, file: &FileEntry) -> Result<Vec<u8>> {
        self.contents
            .get(&file.id)
            .cloned()
            .with_context(|| format!("No content stored for file '{}'", file.id))
    }

    fn user(&self, login: &str) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.login == login).cloned())
    }
}
