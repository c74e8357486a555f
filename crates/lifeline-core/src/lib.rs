//! # lifeline-core
//!
//! Core types shared across all Blood Lifeline crates:
//! - The closed [`Role`](enums::Role) and [`BloodGroup`](enums::BloodGroup) enums
//! - The authenticated [`AuthUser`](identity::AuthUser) identity
//! - Document entities stored in the hosted database (role records, donors, blood banks)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
