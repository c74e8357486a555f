//! Donor directory (`donors/{userId}`).

use std::sync::Arc;

use lifeline_core::entities::{DONORS_COLLECTION, Donor, DonorRegistration};
use lifeline_core::enums::BloodGroup;

use super::{CREATED_AT, UPDATED_AT, newest_first};
use crate::document::{DocumentStore, Query, SetOptions, to_fields};
use crate::StoreError;

#[derive(Clone)]
pub struct DonorRepo {
    store: Arc<dyn DocumentStore>,
}

impl DonorRepo {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Register (or re-register) the donor owned by `user_id`.
    ///
    /// The document is replaced wholesale; both timestamps come from the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write or the read-back fails.
    pub async fn create(
        &self,
        user_id: &str,
        registration: &DonorRegistration,
    ) -> Result<Donor, StoreError> {
        let fields = to_fields(registration)?;
        self.store
            .set(
                DONORS_COLLECTION,
                user_id,
                fields,
                SetOptions::replace().with_server_timestamps(&[CREATED_AT, UPDATED_AT]),
            )
            .await?;
        tracing::debug!(user_id, blood_group = %registration.blood_group, "donor registered");

        self.get(user_id)
            .await?
            .ok_or_else(|| StoreError::Decode(format!("donor {user_id} missing after write")))
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, user_id: &str) -> Result<Option<Donor>, StoreError> {
        self.store
            .get(DONORS_COLLECTION, user_id)
            .await?
            .map(|doc| doc.decode::<Donor>())
            .transpose()
    }

    /// Every donor, newest first. The listing methods return at most `limit`
    /// rows when one is given.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn list_all(&self, limit: Option<u32>) -> Result<Vec<Donor>, StoreError> {
        self.run(newest_first(limit)).await
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn by_city(
        &self,
        city: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Donor>, StoreError> {
        self.run(newest_first(limit).where_eq("city", city)).await
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn by_blood_group(
        &self,
        group: BloodGroup,
        limit: Option<u32>,
    ) -> Result<Vec<Donor>, StoreError> {
        self.run(newest_first(limit).where_eq("bloodGroup", group.as_str()))
            .await
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn by_city_and_blood_group(
        &self,
        city: &str,
        group: BloodGroup,
        limit: Option<u32>,
    ) -> Result<Vec<Donor>, StoreError> {
        self.run(
            newest_first(limit)
                .where_eq("city", city)
                .where_eq("bloodGroup", group.as_str()),
        )
        .await
    }

    async fn run(&self, query: Query) -> Result<Vec<Donor>, StoreError> {
        self.store
            .query(DONORS_COLLECTION, &query)
            .await?
            .into_iter()
            .map(|doc| doc.decode::<Donor>())
            .collect()
    }
}
