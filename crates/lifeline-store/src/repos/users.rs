//! Role records: one `users/{userId}` document per account.

use std::sync::Arc;

use async_trait::async_trait;
use lifeline_core::entities::{RoleRecord, USERS_COLLECTION};
use lifeline_core::enums::Role;
use serde_json::{Map, Value};

use super::{CREATED_AT, UPDATED_AT};
use crate::document::{DocumentStore, SetOptions, WriteMode};
use crate::StoreError;

/// Caller-supplied part of a role record. Timestamps are always assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecordFields {
    pub role: Role,
    pub display_name: String,
    pub email: String,
}

impl RoleRecordFields {
    fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("role".into(), Value::from(self.role.as_str()));
        fields.insert("fullName".into(), Value::from(self.display_name));
        fields.insert("email".into(), Value::from(self.email));
        fields
    }
}

/// Lookup and write of per-user role records.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// `Ok(None)` when the user has no record.
    async fn get(&self, user_id: &str) -> Result<Option<RoleRecord>, StoreError>;

    /// Write the record for `user_id`, stamping `createdAt` and `updatedAt`.
    async fn set(
        &self,
        user_id: &str,
        fields: RoleRecordFields,
        mode: WriteMode,
    ) -> Result<(), StoreError>;
}

/// [`RoleStore`] over the `users` collection of a document store.
#[derive(Clone)]
pub struct UserRepo {
    store: Arc<dyn DocumentStore>,
}

impl UserRepo {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoleStore for UserRepo {
    async fn get(&self, user_id: &str) -> Result<Option<RoleRecord>, StoreError> {
        self.store
            .get(USERS_COLLECTION, user_id)
            .await?
            .map(|doc| doc.decode::<RoleRecord>())
            .transpose()
    }

    async fn set(
        &self,
        user_id: &str,
        fields: RoleRecordFields,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        let options = SetOptions {
            mode,
            server_timestamps: Vec::new(),
        }
        .with_server_timestamps(&[CREATED_AT, UPDATED_AT]);

        tracing::debug!(user_id, role = %fields.role, "writing role record");
        self.store
            .set(USERS_COLLECTION, user_id, fields.into_fields(), options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    fn fields(role: Role) -> RoleRecordFields {
        RoleRecordFields {
            role,
            display_name: "A".into(),
            email: "a@x.com".into(),
        }
    }

    #[tokio::test]
    async fn missing_record_reads_as_none() {
        let repo = UserRepo::new(Arc::new(MemoryDocumentStore::new()));
        assert_eq!(repo.get("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn written_record_reads_back() {
        let repo = UserRepo::new(Arc::new(MemoryDocumentStore::new()));
        repo.set("u1", fields(Role::Donor), WriteMode::Merge)
            .await
            .unwrap();

        let record = repo.get("u1").await.unwrap().expect("record");
        assert_eq!(record.role, Role::Donor);
        assert_eq!(record.display_name, "A");
        assert_eq!(record.email, "a@x.com");
    }

    #[tokio::test]
    async fn merge_write_keeps_foreign_fields() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut extra = Map::new();
        extra.insert("phone".into(), Value::from("555"));
        store
            .set(USERS_COLLECTION, "u1", extra, SetOptions::replace())
            .await
            .unwrap();

        let repo = UserRepo::new(store.clone());
        repo.set("u1", fields(Role::Admin), WriteMode::Merge)
            .await
            .unwrap();

        let doc = store.get(USERS_COLLECTION, "u1").await.unwrap().expect("doc");
        assert_eq!(doc.fields["phone"], "555");
        assert_eq!(doc.fields["role"], "admin");
        assert!(doc.fields.contains_key(CREATED_AT));
        assert!(doc.fields.contains_key(UPDATED_AT));
    }

    #[tokio::test]
    async fn unknown_role_is_a_decode_error() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut bad = Map::new();
        bad.insert("role".into(), Value::from("superuser"));
        store
            .set(USERS_COLLECTION, "u1", bad, SetOptions::replace())
            .await
            .unwrap();

        let err = UserRepo::new(store).get("u1").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
