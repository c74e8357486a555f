//! In-process [`DocumentStore`] for tests and offline runs.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::document::{Document, DocumentStore, Query, SetOptions, WriteMode};
use crate::StoreError;

type Collection = BTreeMap<String, Map<String, Value>>;

/// Documents held in memory, keyed by collection then id.
///
/// Server timestamps are stamped with the local clock as RFC 3339 strings.
/// [`set_offline`](Self::set_offline) makes every call fail with
/// `StoreError::Network`, which tests use to simulate a degraded backend.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Collection>>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of documents in `collection`.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .map_or(0, |c| c.get(collection).map_or(0, BTreeMap::len))
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Network("document store is offline".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Collection>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Network("document store lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
        options: SetOptions,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));

        let mut collections = self.lock()?;
        let docs = collections.entry(collection.to_string()).or_default();
        let doc = docs.entry(id.to_string()).or_default();
        if options.mode == WriteMode::Replace {
            doc.clear();
        }
        doc.extend(fields);
        for field in options.server_timestamps {
            doc.insert(field, now.clone());
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let collections = self.lock()?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|(_, fields)| {
                query
                    .filters
                    .iter()
                    .all(|f| fields.get(&f.field) == Some(&f.value))
            })
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();

        if let Some(order) = &query.order_by {
            matched.sort_by(|a, b| {
                let ord = compare_values(a.fields.get(&order.field), b.fields.get(&order.field));
                if order.descending { ord.reverse() } else { ord }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit as usize);
        }

        Ok(matched)
    }
}

/// Order two optional field values. Missing sorts first; timestamps compare
/// chronologically, numbers numerically, other strings lexicographically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => CmpOrdering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[tokio::test]
    async fn merge_keeps_unrelated_fields() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "u1", fields(json!({"role": "donor", "phone": "1"})), SetOptions::replace())
            .await
            .unwrap();
        store
            .set("users", "u1", fields(json!({"role": "admin"})), SetOptions::merge())
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().expect("doc");
        assert_eq!(doc.fields["role"], "admin");
        assert_eq!(doc.fields["phone"], "1");
    }

    #[tokio::test]
    async fn replace_drops_unrelated_fields() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "u1", fields(json!({"role": "donor", "phone": "1"})), SetOptions::replace())
            .await
            .unwrap();
        store
            .set("users", "u1", fields(json!({"role": "admin"})), SetOptions::replace())
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().expect("doc");
        assert!(!doc.fields.contains_key("phone"));
    }

    #[tokio::test]
    async fn server_timestamps_are_stamped() {
        let store = MemoryDocumentStore::new();
        store
            .set(
                "users",
                "u1",
                fields(json!({"role": "donor"})),
                SetOptions::merge().with_server_timestamps(&["createdAt", "updatedAt"]),
            )
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().expect("doc");
        let stamped = doc.fields["createdAt"].as_str().expect("string timestamp");
        assert!(DateTime::parse_from_rfc3339(stamped).is_ok());
    }

    #[tokio::test]
    async fn offline_store_fails_with_network_error() {
        let store = MemoryDocumentStore::new();
        store.set_offline(true);
        let err = store.get("users", "u1").await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn query_filters_orders_and_limits() {
        let store = MemoryDocumentStore::new();
        for (id, city, at) in [
            ("a", "Pune", "2025-01-01T00:00:00Z"),
            ("b", "Pune", "2025-03-01T00:00:00Z"),
            ("c", "Goa", "2025-02-01T00:00:00Z"),
            ("d", "Pune", "2025-02-01T00:00:00Z"),
        ] {
            store
                .set("donors", id, fields(json!({"city": city, "createdAt": at})), SetOptions::replace())
                .await
                .unwrap();
        }

        let query = Query::new()
            .where_eq("city", "Pune")
            .order_by_desc("createdAt")
            .limit(2);
        let ids: Vec<String> = store
            .query("donors", &query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[tokio::test]
    async fn query_on_missing_collection_is_empty() {
        let store = MemoryDocumentStore::new();
        assert!(store.query("nothing", &Query::new()).await.unwrap().is_empty());
    }

    #[test]
    fn timestamps_compare_chronologically_across_offsets() {
        let earlier = json!("2025-01-01T10:00:00+05:30");
        let later = json!("2025-01-01T05:00:00Z");
        assert_eq!(compare_values(Some(&earlier), Some(&later)), CmpOrdering::Less);
    }
}
