use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::BloodGroup;

/// A registered blood donor. `id` is the owner's user id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub city: String,
    pub state: String,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp_or_now")]
    #[schemars(with = "DateTime<Utc>")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp_or_now")]
    #[schemars(with = "DateTime<Utc>")]
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when registering a donor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DonorRegistration {
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub city: String,
    pub state: String,
}
