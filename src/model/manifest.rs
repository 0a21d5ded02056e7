use serde::{Deserialize, Serialize};

/// The set of entries one generation of the asset cache must hold.
///
/// Asset paths are resolved against the worker scope. Bumping
/// `cache_version` makes every older cache eligible for eviction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub cache_version: String,
    pub assets: Vec<String>,

    /// Served when a navigation request cannot reach the network.
    pub entry_point: String,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            cache_version: "poke-rand-v1".into(),
            assets: vec!["items/poke-ball.png".into()],
            entry_point: "items/poke-ball.png".into(),
        }
    }
}

impl CacheManifest {
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_version.trim().is_empty() {
            return Err("cache_version must not be empty".into());
        }
        if self.cache_version.starts_with('.')
            || self
                .cache_version
                .chars()
                .any(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(format!(
                "cache_version '{}' is not usable as a cache name",
                self.cache_version
            ));
        }
        if !self.assets.iter().any(|a| a == &self.entry_point) {
            return Err(format!(
                "entry point '{}' is not listed in assets",
                self.entry_point
            ));
        }
        Ok(())
    }
}
