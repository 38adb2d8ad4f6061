//! Tool settings (`~/.config/volview-session/settings.toml`).
//!
//! Every key is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vvs_core::SESSION_EXTENSIONS;

use crate::paths;

pub const DEFAULT_API_ROOT: &str = "api/v1";
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".volview_config.yaml";
/// Config files larger than this are never read.
pub const DEFAULT_MAX_CONFIG_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_CONTAINER_NAME: &str = ".config";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub config: ConfigSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Path (`api/v1`) or absolute base URL of the resource API.
    #[serde(default = "default_api_root")]
    pub api_root: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSettings {
    /// Item name looked up at each folder level.
    #[serde(default = "default_config_file_name")]
    pub file_name: String,
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
    /// Folder consulted next to a root folder, under the same owner.
    #[serde(default = "default_container_name")]
    pub container_name: String,
    /// Folder id tried last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_folder: Option<String>,
}

impl Default for ConfigSettings {
    fn default() -> Self {
        Self {
            file_name: default_config_file_name(),
            max_size_bytes: default_max_size_bytes(),
            container_name: default_container_name(),
            fallback_folder: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Name endings that mark saved session artifacts.
    #[serde(default = "default_session_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            extensions: default_session_extensions(),
        }
    }
}

fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}

fn default_config_file_name() -> String {
    DEFAULT_CONFIG_FILE_NAME.to_string()
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_CONFIG_BYTES
}

fn default_container_name() -> String {
    DEFAULT_CONTAINER_NAME.to_string()
}

fn default_session_extensions() -> Vec<String> {
    SESSION_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Settings {
    /// Load from the default location.
    ///
    /// Returns `Default` if the file does not exist or if the config
    /// directory cannot be determined.
    pub fn load() -> Result<Self> {
        match Self::settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. Unlike [`Settings::load`], a missing file
    /// is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub fn settings_path() -> Option<PathBuf> {
        paths::settings_path()
    }

    /// Default settings TOML with comments.
    pub fn default_template() -> String {
        r#"# volview-session settings
# Location: ~/.config/volview-session/settings.toml

[server]
api_root = "api/v1"  # path or absolute base URL used in download links

[config]
file_name = ".volview_config.yaml"  # config item looked up at each folder level
max_size_bytes = 1048576            # larger config files are skipped
container_name = ".config"          # folder consulted after a root folder
# fallback_folder = "<folder id>"   # consulted last

[sessions]
extensions = [".volview.zip", ".volview.json"]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.api_root, "api/v1");
        assert_eq!(settings.config.file_name, ".volview_config.yaml");
        assert_eq!(settings.config.max_size_bytes, 1024 * 1024);
        assert_eq!(settings.config.container_name, ".config");
        assert!(settings.config.fallback_folder.is_none());
        assert_eq!(settings.sessions.extensions, SESSION_EXTENSIONS);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Settings = toml::from_str(&Settings::default_template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[config]\nmax_size_bytes = 512\nfallback_folder = \"shared\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.config.max_size_bytes, 512);
        assert_eq!(settings.config.fallback_folder.as_deref(), Some("shared"));
        assert_eq!(settings.config.file_name, DEFAULT_CONFIG_FILE_NAME);
        assert_eq!(settings.server, ServerSettings::default());
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let dir = tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings"));
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[config]\nmax_size_bytes = \"big\"\n").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse settings"));
    }

    #[test]
    fn test_serializes_round_trip() {
        let mut settings = Settings::default();
        settings.config.fallback_folder = Some("f9".into());
        let text = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
