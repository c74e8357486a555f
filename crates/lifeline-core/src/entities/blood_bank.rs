use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered blood bank. `id` is the owner's user id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BloodBank {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp_or_now")]
    #[schemars(with = "DateTime<Utc>")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp_or_now")]
    #[schemars(with = "DateTime<Utc>")]
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when registering a blood bank.
///
/// Verification defaults to `false`; only an admin flow should set it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BloodBankRegistration {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}
