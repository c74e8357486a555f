//! Entity structs for documents stored in the hosted database.
//!
//! Every document is keyed by the owner's provider user id. Field names use
//! the `camelCase` spelling already present in the collections (`bloodGroup`,
//! `isVerified`, `createdAt`). Timestamps missing from a stored document, or
//! stored as `null`, read back as the current time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

mod blood_bank;
mod donor;
mod role_record;

pub use blood_bank::{BloodBank, BloodBankRegistration};
pub use donor::{Donor, DonorRegistration};
pub use role_record::RoleRecord;

/// Collection holding one [`RoleRecord`] per user.
pub const USERS_COLLECTION: &str = "users";
/// Collection holding one [`Donor`] per donor account.
pub const DONORS_COLLECTION: &str = "donors";
/// Collection holding one [`BloodBank`] per blood bank account.
pub const BLOOD_BANKS_COLLECTION: &str = "bloodBanks";

fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(Utc::now))
}
