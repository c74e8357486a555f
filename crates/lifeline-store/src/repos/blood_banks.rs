//! Blood bank directory (`bloodBanks/{userId}`).

use std::sync::Arc;

use lifeline_core::entities::{BLOOD_BANKS_COLLECTION, BloodBank, BloodBankRegistration};
use serde_json::Value;

use super::{CREATED_AT, UPDATED_AT, newest_first};
use crate::document::{DocumentStore, Query, SetOptions, to_fields};
use crate::StoreError;

#[derive(Clone)]
pub struct BloodBankRepo {
    store: Arc<dyn DocumentStore>,
}

impl BloodBankRepo {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Register the blood bank owned by `user_id`. Unverified unless the
    /// registration says otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write or the read-back fails.
    pub async fn create(
        &self,
        user_id: &str,
        registration: &BloodBankRegistration,
    ) -> Result<BloodBank, StoreError> {
        let mut fields = to_fields(registration)?;
        fields.insert(
            "isVerified".into(),
            Value::Bool(registration.is_verified.unwrap_or(false)),
        );
        self.store
            .set(
                BLOOD_BANKS_COLLECTION,
                user_id,
                fields,
                SetOptions::replace().with_server_timestamps(&[CREATED_AT, UPDATED_AT]),
            )
            .await?;
        tracing::debug!(user_id, city = %registration.city, "blood bank registered");

        self.get(user_id).await?.ok_or_else(|| {
            StoreError::Decode(format!("blood bank {user_id} missing after write"))
        })
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, user_id: &str) -> Result<Option<BloodBank>, StoreError> {
        self.store
            .get(BLOOD_BANKS_COLLECTION, user_id)
            .await?
            .map(|doc| doc.decode::<BloodBank>())
            .transpose()
    }

    /// Every bank, newest first. The listing methods return at most `limit`
    /// rows when one is given.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn list_all(&self, limit: Option<u32>) -> Result<Vec<BloodBank>, StoreError> {
        self.run(newest_first(limit)).await
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn by_city(
        &self,
        city: &str,
        limit: Option<u32>,
    ) -> Result<Vec<BloodBank>, StoreError> {
        self.run(newest_first(limit).where_eq("city", city)).await
    }

    /// Only banks an admin has verified.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn verified(&self, limit: Option<u32>) -> Result<Vec<BloodBank>, StoreError> {
        self.run(newest_first(limit).where_eq("isVerified", true)).await
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn by_state(
        &self,
        state: &str,
        limit: Option<u32>,
    ) -> Result<Vec<BloodBank>, StoreError> {
        self.run(newest_first(limit).where_eq("state", state)).await
    }

    async fn run(&self, query: Query) -> Result<Vec<BloodBank>, StoreError> {
        self.store
            .query(BLOOD_BANKS_COLLECTION, &query)
            .await?
            .into_iter()
            .map(|doc| doc.decode::<BloodBank>())
            .collect()
    }
}
