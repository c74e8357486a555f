//! The cached `(user id, role)` pair used for optimistic startup.

use std::sync::Arc;

use lifeline_core::enums::Role;

use crate::{LocalCache, keys};

/// Last resolved session as remembered by the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSession {
    pub user_id: String,
    pub role: Role,
}

/// Reads and writes the session hint. Storage failures are logged and
/// swallowed: a broken cache must never break sign-in.
#[derive(Clone)]
pub struct SessionSnapshotStore {
    cache: Arc<dyn LocalCache>,
}

impl SessionSnapshotStore {
    #[must_use]
    pub fn new(cache: Arc<dyn LocalCache>) -> Self {
        Self { cache }
    }

    /// Remember `user_id` and `role`. A `None` role is stored as an empty string.
    pub fn save(&self, user_id: &str, role: Option<Role>) {
        if let Err(error) = self.cache.set(keys::USER_ID, user_id) {
            tracing::warn!(%error, "failed to store cached user id");
            return;
        }
        let role = role.map_or("", Role::as_str);
        if let Err(error) = self.cache.set(keys::USER_ROLE, role) {
            tracing::warn!(%error, "failed to store cached role");
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        match self.cache.get(keys::USER_ID) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(error) => {
                tracing::warn!(%error, "failed to read cached user id");
                None
            }
        }
    }

    /// Cached role, only if it names a role a user can hold from sign-up.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self.cache.get(keys::USER_ROLE) {
            Ok(value) => value
                .and_then(|v| v.parse::<Role>().ok())
                .filter(|role| role.is_assignable()),
            Err(error) => {
                tracing::warn!(%error, "failed to read cached role");
                None
            }
        }
    }

    /// Both halves of the hint, or `None` if either is missing.
    #[must_use]
    pub fn load(&self) -> Option<CachedSession> {
        let user_id = self.user_id()?;
        let role = self.role()?;
        Some(CachedSession { user_id, role })
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.load().is_some()
    }

    pub fn clear(&self) {
        for key in [keys::USER_ID, keys::USER_ROLE] {
            if let Err(error) = self.cache.remove(key) {
                tracing::warn!(%error, key, "failed to clear cached session");
            }
        }
    }
}
