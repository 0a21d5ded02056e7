use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::creature::KANA_LANGUAGE;
use crate::model::manifest::CacheManifest;

pub const APP_DIR: &str = "poke_rand";

/// Highest creature id known to be served by the data API.
pub const DEFAULT_MAX_ID: u32 = 1010;

/// How many random ids a round may try before giving up.
pub const DEFAULT_MAX_TRIALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub max_id: u32,
    pub max_trials: usize,

    /// Language tag whose localized name is shown on reveal.
    pub preferred_language: String,

    /// Requests under this prefix are handled by the asset cache worker.
    pub asset_scope: String,
    pub cache: CacheManifest,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "https://pokeapi.co/api/v2".into(),
            max_id: DEFAULT_MAX_ID,
            max_trials: DEFAULT_MAX_TRIALS,
            preferred_language: KANA_LANGUAGE.into(),
            asset_scope: "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/".into(),
            cache: CacheManifest::default(),
        }
    }
}

pub fn app_dir(base: Option<PathBuf>) -> PathBuf {
    let mut path = base.unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    fs::create_dir_all(&path).ok();
    path
}

fn config_path() -> PathBuf {
    let mut path = app_dir(dirs::config_dir());
    path.push("config.json");
    path
}

/// Missing or unreadable config falls back to defaults, which are written
/// back so there is a file to edit.
pub fn load_config() -> AppConfig {
    let path = config_path();
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config");
            AppConfig::default()
        }),
        Err(_) => {
            let config = AppConfig::default();
            save_config(&config);
            config
        }
    }
}

pub fn save_config(config: &AppConfig) {
    let path = config_path();
    if let Ok(json) = serde_json::to_string_pretty(config) {
        if let Err(e) = fs::write(&path, json) {
            tracing::debug!(path = %path.display(), error = %e, "Could not write config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "max_id": 151 }"#).unwrap();
        assert_eq!(config.max_id, 151);
        assert_eq!(config.max_trials, DEFAULT_MAX_TRIALS);
        assert_eq!(config.preferred_language, "ja-Hrkt");
        assert_eq!(config.cache.cache_version, "poke-rand-v1");
    }
}
