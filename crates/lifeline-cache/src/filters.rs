//! Persisted search filters (selected city and blood group).

use std::sync::Arc;

use lifeline_core::enums::BloodGroup;

use crate::{LocalCache, keys};

/// Filter state restored from, and written through to, the local cache.
///
/// Setting an empty value removes the key rather than storing `""`.
pub struct SearchFilters {
    cache: Arc<dyn LocalCache>,
    city: String,
    blood_group: String,
}

impl SearchFilters {
    /// Restore filters from the cache. Unreadable entries start empty.
    #[must_use]
    pub fn load(cache: Arc<dyn LocalCache>) -> Self {
        let city = read_or_empty(cache.as_ref(), keys::SELECTED_CITY);
        let blood_group = read_or_empty(cache.as_ref(), keys::SELECTED_BLOOD_GROUP);
        Self {
            cache,
            city,
            blood_group,
        }
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn blood_group(&self) -> &str {
        &self.blood_group
    }

    /// The blood group filter if it names a known group.
    #[must_use]
    pub fn parsed_blood_group(&self) -> Option<BloodGroup> {
        self.blood_group.parse().ok()
    }

    pub fn set_city(&mut self, city: &str) {
        city.clone_into(&mut self.city);
        write_or_remove(self.cache.as_ref(), keys::SELECTED_CITY, city);
    }

    pub fn set_blood_group(&mut self, blood_group: &str) {
        blood_group.clone_into(&mut self.blood_group);
        write_or_remove(self.cache.as_ref(), keys::SELECTED_BLOOD_GROUP, blood_group);
    }

    pub fn clear(&mut self) {
        self.city.clear();
        self.blood_group.clear();
        for key in [keys::SELECTED_CITY, keys::SELECTED_BLOOD_GROUP] {
            if let Err(error) = self.cache.remove(key) {
                tracing::warn!(%error, key, "failed to clear filter");
            }
        }
    }
}

fn read_or_empty(cache: &dyn LocalCache, key: &str) -> String {
    match cache.get(key) {
        Ok(value) => value.unwrap_or_default(),
        Err(error) => {
            tracing::warn!(%error, key, "failed to read filter");
            String::new()
        }
    }
}

fn write_or_remove(cache: &dyn LocalCache, key: &str, value: &str) {
    let result = if value.is_empty() {
        cache.remove(key)
    } else {
        cache.set(key, value)
    };
    if let Err(error) = result {
        tracing::warn!(%error, key, "failed to store filter");
    }
}
