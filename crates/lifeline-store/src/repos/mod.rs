//! Typed repositories over a [`DocumentStore`](crate::DocumentStore).
//!
//! Each repository owns an `Arc<dyn DocumentStore>` and one collection.
//! Documents are keyed by the owning user's provider id.

pub mod blood_banks;
pub mod donors;
pub mod users;

pub use blood_banks::BloodBankRepo;
pub use donors::DonorRepo;
pub use users::{RoleRecordFields, RoleStore, UserRepo};

use crate::document::Query;

/// Field every directory listing is ordered by, newest first.
pub(crate) const CREATED_AT: &str = "createdAt";
pub(crate) const UPDATED_AT: &str = "updatedAt";

/// Listing query, capped server-side when `limit` is given.
pub(crate) fn newest_first(limit: Option<u32>) -> Query {
    let query = Query::new().order_by_desc(CREATED_AT);
    match limit {
        Some(limit) => query.limit(limit),
        None => query,
    }
}
