//! # lifeline-config
//!
//! Layered configuration loading for Blood Lifeline using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LIFELINE_*` prefix, `__` as separator)
//! 2. Project-level `.lifeline/config.toml`
//! 3. User-level `~/.config/lifeline/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LIFELINE_FIREBASE__API_KEY` -> `firebase.api_key`,
//! `LIFELINE_CACHE__DIR` -> `cache.dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lifeline_config::LifelineConfig;
//!
//! let config = LifelineConfig::load_with_dotenv().expect("config");
//! if config.firebase.is_configured() {
//!     println!("project: {}", config.firebase.project_id);
//! }
//! ```

mod cache;
mod error;
mod firebase;
mod general;

pub use cache::CacheConfig;
pub use error::ConfigError;
pub use firebase::FirebaseConfig;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "LIFELINE_";
const PROJECT_CONFIG: &str = ".lifeline/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LifelineConfig {
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LifelineConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// for `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Defaults, then user TOML, then project TOML, then `LIFELINE_*` env.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let files = [Self::user_config_path(), Some(PathBuf::from(PROJECT_CONFIG))];
        files
            .into_iter()
            .flatten()
            .filter(|path| path.exists())
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lifeline").join("config.toml"))
    }

    /// Best effort: a missing `.env` is not an error.
    fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }
}
