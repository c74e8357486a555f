//! Local cache location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CACHE_FILE_NAME: &str = "local_storage.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding the local key-value file. Empty means the platform
    /// data directory (`~/.local/share/lifeline` on Linux).
    #[serde(default)]
    pub dir: String,
}

impl CacheConfig {
    /// Full path of the local key-value file, if a directory can be resolved.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        let dir = if self.dir.is_empty() {
            dirs::data_local_dir()?.join("lifeline")
        } else {
            PathBuf::from(&self.dir)
        };
        Some(dir.join(CACHE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_is_used() {
        let config = CacheConfig {
            dir: "/tmp/lifeline-test".into(),
        };
        assert_eq!(
            config.file_path().expect("path"),
            PathBuf::from("/tmp/lifeline-test/local_storage.json")
        );
    }

    #[test]
    fn default_dir_ends_with_lifeline() {
        if let Some(path) = CacheConfig::default().file_path() {
            assert!(path.ends_with("lifeline/local_storage.json"));
        }
    }
}
