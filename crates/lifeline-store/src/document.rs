//! Generic document model and the [`DocumentStore`] trait.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::StoreError;

/// A stored document: its key inside the collection plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Decode into an entity, exposing the document key as an `id` field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the fields do not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let Self { id, mut fields } = self;
        fields.insert("id".into(), Value::String(id.clone()));
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| StoreError::Decode(format!("document {id}: {e}")))
    }
}

/// Encode an entity into document fields, dropping any `id` field
/// (the key lives in the document name, not its body).
///
/// # Errors
///
/// Returns `StoreError::Encode` if `value` does not serialize to a JSON object.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value).map_err(|e| StoreError::Encode(e.to_string()))? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::Encode(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// How a write treats fields already present on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Only the written fields change; everything else is kept.
    Merge,
    /// The document is replaced by exactly the written fields.
    #[default]
    Replace,
}

/// Options for [`DocumentStore::set`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub mode: WriteMode,
    /// Fields the store stamps with its own clock at write time.
    pub server_timestamps: Vec<String>,
}

impl SetOptions {
    #[must_use]
    pub fn merge() -> Self {
        Self {
            mode: WriteMode::Merge,
            server_timestamps: Vec::new(),
        }
    }

    #[must_use]
    pub fn replace() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_server_timestamps(mut self, fields: &[&str]) -> Self {
        self.server_timestamps
            .extend(fields.iter().map(|f| (*f).to_string()));
        self
    }
}

/// Equality constraint on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// Sort key for query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// A collection query: all filters must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Keyed-document CRUD over named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` means it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Write one document according to `options`.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
        options: SetOptions,
    ) -> Result<(), StoreError>;

    /// Run an equality-filtered, optionally ordered query.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Thing {
        id: String,
        name: String,
    }

    #[test]
    fn to_fields_drops_id() {
        let fields = to_fields(&Thing {
            id: "t1".into(),
            name: "n".into(),
        })
        .unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["name"], "n");
    }

    #[test]
    fn decode_restores_id_from_key() {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from("n"));
        let thing: Thing = Document {
            id: "t1".into(),
            fields,
        }
        .decode()
        .unwrap();
        assert_eq!(thing.id, "t1");
    }

    #[test]
    fn decode_reports_the_document_key() {
        let err = Document {
            id: "broken".into(),
            fields: Map::new(),
        }
        .decode::<Thing>()
        .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn to_fields_rejects_scalars() {
        assert!(matches!(to_fields(&5), Err(StoreError::Encode(_))));
    }

    #[test]
    fn query_builder_accumulates() {
        let query = Query::new()
            .where_eq("city", "Pune")
            .where_eq("isVerified", true)
            .order_by_desc("createdAt")
            .limit(10);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.order_by.as_ref().map(|o| o.descending), Some(true));
        assert_eq!(query.limit, Some(10));
    }
}
