//! Settings that are not tied to one backend.

use serde::{Deserialize, Serialize};

const fn default_limit() -> u32 {
    20
}

const fn default_resolve_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Rows returned by list commands when `--limit` is not given.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// How long the CLI waits for the first resolved session.
    #[serde(default = "default_resolve_timeout_secs")]
    pub resolve_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            resolve_timeout_secs: default_resolve_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Figment;
    use figment::providers::{Format, Toml};

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: GeneralConfig = Figment::new()
            .merge(Toml::string("default_limit = 5"))
            .extract()
            .expect("general config should extract");
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.resolve_timeout_secs, 15);
    }
}
