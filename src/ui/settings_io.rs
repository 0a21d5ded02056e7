use std::fs;
use std::path::PathBuf;

use crate::config::app_dir;
use crate::ui::settings::UiSettings;

fn settings_path() -> PathBuf {
    let mut path = app_dir(dirs::config_dir());
    path.push("ui_settings.json");
    path
}

pub fn load_settings() -> UiSettings {
    let path = settings_path();
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_settings(settings: &UiSettings) {
    let path = settings_path();
    if let Ok(json) = serde_json::to_string_pretty(settings) {
        if let Err(e) = fs::write(&path, json) {
            tracing::debug!(path = %path.display(), error = %e, "Could not save UI settings");
        }
    }
}
