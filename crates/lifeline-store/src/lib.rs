//! # lifeline-store
//!
//! Keyed-document persistence for Blood Lifeline.
//!
//! - [`DocumentStore`] is the generic seam: get, set (merge or replace, with
//!   server-assigned timestamps), and equality-filtered ordered queries.
//! - [`MemoryDocumentStore`] backs tests and offline runs.
//! - [`FirestoreStore`] talks to the Firestore REST API.
//! - [`repos`] holds the typed collections: role records (the [`RoleStore`]),
//!   donors, and blood banks.

pub mod document;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod repos;

pub use document::{Document, DocumentStore, FieldFilter, OrderBy, Query, SetOptions, WriteMode};
pub use error::StoreError;
pub use firestore::FirestoreStore;
pub use memory::MemoryDocumentStore;
pub use repos::{BloodBankRepo, DonorRepo, RoleRecordFields, RoleStore, UserRepo};
