//! Firestore REST backend.
//!
//! Calls the v1 REST API directly via `reqwest`:
//! - `GET  documents/{collection}/{id}` for reads (404 means missing)
//! - `POST documents:commit` for writes, with `updateMask` for merge writes
//!   and `REQUEST_TIME` field transforms for server timestamps
//! - `POST documents:runQuery` for structured queries

pub mod codec;

use std::sync::RwLock;

use async_trait::async_trait;
use lifeline_config::FirebaseConfig;
use serde_json::{Map, Value, json};

use crate::document::{Document, DocumentStore, Query, SetOptions, WriteMode};
use crate::StoreError;

pub struct FirestoreStore {
    client: reqwest::Client,
    documents_url: String,
    resource_root: String,
    api_key: String,
    id_token: RwLock<Option<String>>,
}

impl FirestoreStore {
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            documents_url: config.documents_url(),
            resource_root: format!(
                "projects/{}/databases/{}/documents",
                config.project_id, config.database
            ),
            api_key: config.api_key.clone(),
            id_token: RwLock::new(None),
        }
    }

    /// Attach (or detach) the signed-in user's ID token to subsequent calls.
    pub fn set_id_token(&self, token: Option<String>) {
        match self.id_token.write() {
            Ok(mut slot) => *slot = token,
            Err(_) => tracing::warn!("firestore token lock poisoned; keeping previous token"),
        }
    }

    fn with_key(&self, url: String) -> String {
        if self.api_key.is_empty() {
            url
        } else {
            format!("{url}?key={}", urlencoding::encode(&self.api_key))
        }
    }

    fn document_path(collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.id_token.read().ok().and_then(|slot| slot.clone());
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Request body for a single-document commit.
    fn commit_body(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
        options: &SetOptions,
    ) -> Value {
        let mut write = json!({
            "update": {
                "name": format!("{}/{}/{}", self.resource_root, collection, id),
                "fields": codec::encode_fields(fields),
            }
        });

        if options.mode == WriteMode::Merge {
            let paths: Vec<&String> = fields.keys().collect();
            write["updateMask"] = json!({ "fieldPaths": paths });
        }

        if !options.server_timestamps.is_empty() {
            let transforms: Vec<Value> = options
                .server_timestamps
                .iter()
                .map(|field| json!({ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }))
                .collect();
            write["updateTransforms"] = Value::Array(transforms);
        }

        json!({ "writes": [write] })
    }

    /// Request body for `runQuery`.
    fn structured_query(collection: &str, query: &Query) -> Value {
        let mut structured = json!({ "from": [{ "collectionId": collection }] });

        let filters: Vec<Value> = query
            .filters
            .iter()
            .map(|f| {
                json!({ "fieldFilter": {
                    "field": { "fieldPath": f.field },
                    "op": "EQUAL",
                    "value": codec::encode_value(&f.value),
                }})
            })
            .collect();
        match filters.len() {
            0 => {}
            1 => structured["where"] = filters[0].clone(),
            _ => {
                structured["where"] = json!({ "compositeFilter": { "op": "AND", "filters": filters } });
            }
        }

        if let Some(order) = &query.order_by {
            structured["orderBy"] = json!([{
                "field": { "fieldPath": order.field },
                "direction": if order.descending { "DESCENDING" } else { "ASCENDING" },
            }]);
        }
        if let Some(limit) = query.limit {
            structured["limit"] = json!(limit);
        }

        json!({ "structuredQuery": structured })
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

fn decode_document(raw: &Value) -> Result<Document, StoreError> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Decode("document missing 'name'".into()))?;
    let fields = match raw.get("fields") {
        Some(fields) => codec::decode_fields(fields)?,
        None => Map::new(),
    };
    Ok(Document {
        id: codec::id_from_name(name).to_string(),
        fields,
    })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.with_key(format!(
            "{}/{}",
            self.documents_url,
            Self::document_path(collection, id)
        ));
        tracing::debug!(collection, id, "firestore get");

        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let raw: Value = ensure_success(response).await?.json().await?;
        decode_document(&raw).map(Some)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
        options: SetOptions,
    ) -> Result<(), StoreError> {
        let url = self.with_key(format!("{}:commit", self.documents_url));
        let body = self.commit_body(collection, id, &fields, &options);
        tracing::debug!(collection, id, mode = ?options.mode, "firestore commit");

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let url = self.with_key(format!("{}:runQuery", self.documents_url));
        let body = Self::structured_query(collection, query);
        tracing::debug!(collection, filters = query.filters.len(), "firestore runQuery");

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let rows: Vec<Value> = ensure_success(response).await?.json().await?;

        rows.iter()
            .filter_map(|row| row.get("document"))
            .map(decode_document)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> FirestoreStore {
        FirestoreStore::new(&FirebaseConfig {
            api_key: "AIza test".into(),
            project_id: "demo".into(),
            ..Default::default()
        })
    }

    #[test]
    fn key_is_url_encoded() {
        assert_eq!(
            store().with_key("https://x/doc".into()),
            "https://x/doc?key=AIza%20test"
        );
    }

    #[test]
    fn document_path_escapes_ids() {
        assert_eq!(FirestoreStore::document_path("users", "a/b"), "users/a%2Fb");
    }

    #[test]
    fn merge_commit_carries_mask_and_transforms() {
        let mut fields = Map::new();
        fields.insert("role".into(), json!("donor"));
        let body = store().commit_body(
            "users",
            "u1",
            &fields,
            &SetOptions::merge().with_server_timestamps(&["createdAt"]),
        );

        let write = &body["writes"][0];
        assert_eq!(
            write["update"]["name"],
            "projects/demo/databases/(default)/documents/users/u1"
        );
        assert_eq!(write["update"]["fields"]["role"], json!({"stringValue": "donor"}));
        assert_eq!(write["updateMask"]["fieldPaths"], json!(["role"]));
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "createdAt");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
    }

    #[test]
    fn replace_commit_has_no_mask() {
        let body = store().commit_body("donors", "u1", &Map::new(), &SetOptions::replace());
        assert!(body["writes"][0].get("updateMask").is_none());
        assert!(body["writes"][0].get("updateTransforms").is_none());
    }

    #[test]
    fn single_filter_query_uses_field_filter() {
        let query = Query::new().where_eq("city", "Pune").order_by_desc("createdAt");
        let body = FirestoreStore::structured_query("donors", &query);
        let sq = &body["structuredQuery"];
        assert_eq!(sq["from"][0]["collectionId"], "donors");
        assert_eq!(sq["where"]["fieldFilter"]["field"]["fieldPath"], "city");
        assert_eq!(sq["where"]["fieldFilter"]["value"], json!({"stringValue": "Pune"}));
        assert_eq!(sq["orderBy"][0]["direction"], "DESCENDING");
        assert!(sq.get("limit").is_none());
    }

    #[test]
    fn multi_filter_query_uses_composite_and() {
        let query = Query::new()
            .where_eq("city", "Pune")
            .where_eq("bloodGroup", "O-")
            .limit(5);
        let body = FirestoreStore::structured_query("donors", &query);
        let sq = &body["structuredQuery"];
        assert_eq!(sq["where"]["compositeFilter"]["op"], "AND");
        assert_eq!(
            sq["where"]["compositeFilter"]["filters"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
        assert_eq!(sq["limit"], 5);
    }

    #[test]
    fn decodes_rest_document() {
        let doc = decode_document(&json!({
            "name": "projects/demo/databases/(default)/documents/users/u1",
            "fields": {"role": {"stringValue": "admin"}},
            "createTime": "2025-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(doc.id, "u1");
        assert_eq!(doc.fields["role"], "admin");
    }
}
