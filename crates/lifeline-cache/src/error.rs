use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("cache lock poisoned")]
    Poisoned,
}
