//! Which files a viewer should load, and which items are saved sessions.

use vvs_core::{Item, SESSION_EXTENSIONS};

/// Name suffix of per-folder viewer configuration files.
pub const CONFIG_FILE_SUFFIX: &str = "volview_config.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadableRules {
    pub session_extensions: Vec<String>,
    pub config_suffix: String,
}

impl Default for LoadableRules {
    fn default() -> Self {
        Self {
            session_extensions: SESSION_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            config_suffix: CONFIG_FILE_SUFFIX.to_string(),
        }
    }
}

impl LoadableRules {
    pub fn new(session_extensions: Vec<String>, config_suffix: impl Into<String>) -> Self {
        Self {
            session_extensions,
            config_suffix: config_suffix.into(),
        }
    }

    /// True when `name` ends with one of the session extensions.
    pub fn is_session_file(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.session_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }

    /// Session items are recognised by name; the item carries the extension
    /// of the archive it was created from, sometimes with a suffix such as
    /// ` (1)` appended by the upload.
    pub fn is_session_item(&self, item: &Item) -> bool {
        let lower = item.name.to_ascii_lowercase();
        self.session_extensions
            .iter()
            .any(|ext| lower.contains(&ext.to_ascii_lowercase()))
    }

    /// A file path is loadable unless it is a session artifact or a viewer
    /// configuration file.
    pub fn is_loadable(&self, path: &str) -> bool {
        !self.is_session_file(path) && !path.ends_with(&self.config_suffix)
    }
}
