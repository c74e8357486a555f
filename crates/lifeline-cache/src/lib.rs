//! # lifeline-cache
//!
//! Synchronous, process-local key-value persistence.
//!
//! The cache is never authoritative: it holds the last resolved
//! `(user id, role)` pair for optimistic startup and the user's search
//! filters. Two backends ship here: [`MemoryCache`] for tests and
//! [`FileCache`] for the CLI.

pub mod error;
pub mod file;
pub mod filters;
pub mod memory;
pub mod session_snapshot;

pub use error::CacheError;
pub use file::FileCache;
pub use filters::SearchFilters;
pub use memory::MemoryCache;
pub use session_snapshot::{CachedSession, SessionSnapshotStore};

/// Key-value storage surviving restarts.
///
/// Implementations must be cheap and non-networked; callers invoke them
/// inline from async code.
pub trait LocalCache: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Storage keys shared with the web client.
pub mod keys {
    pub const USER_ID: &str = "blood_lifeline_user_id";
    pub const USER_ROLE: &str = "blood_lifeline_user_role";
    pub const SELECTED_CITY: &str = "blood_lifeline_selected_city";
    pub const SELECTED_BLOOD_GROUP: &str = "blood_lifeline_selected_blood_group";
}
