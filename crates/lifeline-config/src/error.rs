//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source failed to parse or a value had the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the command needs is missing required fields.
    #[error(
        "[{section}] is missing {}; set them in config.toml or as LIFELINE_{}__<FIELD>",
        .missing.join(", "),
        .section.to_uppercase()
    )]
    NotConfigured {
        section: &'static str,
        missing: Vec<&'static str>,
    },
}
