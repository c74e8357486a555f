use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Per-user profile document mapping an identity to its role.
///
/// Written once at sign-up with a merge write; only read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub role: Role,
    #[serde(rename = "fullName", default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp_or_now")]
    #[schemars(with = "DateTime<Utc>")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp_or_now")]
    #[schemars(with = "DateTime<Utc>")]
    pub updated_at: DateTime<Utc>,
}
