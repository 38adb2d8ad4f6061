//! Resource entity graph: collections and users own folders, folders own
//! folders and items, items own files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name suffixes that mark an item as a saved viewer session.
pub const SESSION_EXTENSIONS: &[&str] = &[".volview.zip", ".volview.json"];

/// Owner of a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ParentRef {
    Folder(String),
    Collection(String),
    User(String),
}

impl ParentRef {
    /// Parent folder id, or `None` when the owner is a collection or user.
    pub fn folder_id(&self) -> Option<&str> {
        match self {
            Self::Folder(id) => Some(id),
            Self::Collection(_) | Self::User(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent: ParentRef,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl Folder {
    pub fn new(id: &str, name: &str, parent: ParentRef, created: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            parent,
            created,
            updated: None,
            meta: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    /// Free-form metadata; saved sessions carry `linkedResources` and
    /// `lastOpened` here.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl Item {
    pub fn new(id: &str, name: &str, folder_id: &str, created: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            folder_id: folder_id.to_string(),
            created,
            updated: None,
            meta: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub item_id: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileEntry {
    pub fn new(id: &str, name: &str, item_id: &str, size: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            item_id: item_id.to_string(),
            size,
            mime_type: None,
        }
    }
}

/// Requesting user as seen by config resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    /// Group names the user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_ref_folder_id() {
        assert_eq!(ParentRef::Folder("f1".into()).folder_id(), Some("f1"));
        assert_eq!(ParentRef::Collection("c1".into()).folder_id(), None);
        assert_eq!(ParentRef::User("u1".into()).folder_id(), None);
    }

    #[test]
    fn test_parent_ref_json_shape() {
        let json = serde_json::to_value(ParentRef::Collection("c1".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "collection", "id": "c1"}));
    }

    #[test]
    fn test_item_meta_defaults_to_empty() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": "i1",
            "name": "scan.nrrd",
            "folder_id": "f1",
            "created": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert!(item.meta.is_empty());
        assert!(item.updated.is_none());
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_str(r#"{"login": "bob"}"#).unwrap();
        assert!(user.groups.is_empty());
        assert!(!user.admin);
    }
}
