use std::path::PathBuf;

/// XDG app name for the settings directory.
pub const APP_NAME: &str = "volview-session";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

fn project_config_dir(app_name: &str) -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// `~/.config/volview-session` on Linux; `None` when no home directory
/// can be determined (e.g. in containers without HOME).
pub fn config_dir() -> Option<PathBuf> {
    project_config_dir(APP_NAME)
}

pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_is_under_app_dir() {
        if let Some(path) = settings_path() {
            assert!(path.ends_with("settings.toml"));
            let parent = path.parent().unwrap();
            assert!(parent.to_string_lossy().contains(APP_NAME));
        }
    }
}
