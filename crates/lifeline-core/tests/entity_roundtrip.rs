//! Serde roundtrip and JsonSchema validation tests for stored entities.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use schemars::schema_for;
use lifeline_core::entities::*;
use lifeline_core::enums::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    role_record_roundtrip,
    RoleRecord,
    RoleRecord {
        role: Role::BloodBank,
        display_name: "City Blood Centre".into(),
        email: "centre@example.org".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    donor_roundtrip,
    Donor,
    Donor {
        id: "u1".into(),
        name: "Asha".into(),
        blood_group: BloodGroup::ONegative,
        phone: "+91 98765 43210".into(),
        city: "Pune".into(),
        state: "Maharashtra".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    blood_bank_roundtrip,
    BloodBank,
    BloodBank {
        id: "bank-7".into(),
        name: "Red Cross Bank".into(),
        address: "12 MG Road".into(),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        phone: "080 1234 5678".into(),
        is_verified: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

#[test]
fn role_record_uses_stored_field_names() {
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let record = RoleRecord {
        role: Role::Donor,
        display_name: "A".into(),
        email: "a@x.com".into(),
        created_at: at,
        updated_at: at,
    };
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["role"], "donor");
    assert_eq!(value["fullName"], "A");
    assert_eq!(value["email"], "a@x.com");
    assert!(value.get("createdAt").is_some());
    assert!(value.get("display_name").is_none());
}

#[test]
fn documents_without_timestamps_still_decode() {
    let bank: BloodBank = serde_json::from_value(serde_json::json!({
        "id": "b1",
        "name": "Lifeline",
        "address": "1 Main St",
        "city": "Delhi",
        "state": "Delhi",
        "phone": "011 000",
    }))
    .unwrap();
    assert!(!bank.is_verified);
    assert!(bank.created_at <= Utc::now());
}

#[test]
fn role_record_with_generic_user_role_decodes() {
    let record: RoleRecord = serde_json::from_value(serde_json::json!({
        "role": "user",
        "fullName": "Legacy",
        "email": "legacy@example.org",
    }))
    .unwrap();
    assert_eq!(record.role, Role::User);
}

#[test]
fn null_timestamps_read_as_now() {
    let donor: Donor = serde_json::from_value(serde_json::json!({
        "id": "u1",
        "name": "Asha",
        "bloodGroup": "O-",
        "phone": "1",
        "city": "Pune",
        "state": "Maharashtra",
        "createdAt": null,
        "updatedAt": null,
    }))
    .unwrap();
    assert!(donor.created_at <= Utc::now());

    let bank: BloodBank = serde_json::from_value(serde_json::json!({
        "id": "b1",
        "name": "Lifeline",
        "address": "1 Main St",
        "city": "Delhi",
        "state": "Delhi",
        "phone": "011 000",
        "createdAt": null,
    }))
    .unwrap();
    assert!(bank.created_at <= Utc::now());

    let record: RoleRecord = serde_json::from_value(serde_json::json!({
        "role": "donor",
        "updatedAt": null,
    }))
    .unwrap();
    assert!(record.updated_at <= Utc::now());
}

#[test]
fn stored_timestamps_are_kept() {
    let record: RoleRecord = serde_json::from_value(serde_json::json!({
        "role": "admin",
        "createdAt": "2025-01-02T03:04:05Z",
    }))
    .unwrap();
    assert_eq!(
        record.created_at,
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    );
}

#[test]
fn registration_leaves_unset_verification_out() {
    let registration = BloodBankRegistration {
        name: "N".into(),
        address: "A".into(),
        city: "C".into(),
        state: "S".into(),
        phone: "P".into(),
        is_verified: None,
    };
    let value = serde_json::to_value(&registration).unwrap();
    assert!(value.get("isVerified").is_none());
}

#[test]
fn donor_registration_uses_stored_field_names() {
    let registration = DonorRegistration {
        name: "Ravi".into(),
        blood_group: BloodGroup::BPositive,
        phone: "1".into(),
        city: "Chennai".into(),
        state: "Tamil Nadu".into(),
    };
    let value = serde_json::to_value(&registration).unwrap();
    assert_eq!(value["bloodGroup"], "B+");
    assert_eq!(value["city"], "Chennai");
    assert!(value.get("blood_group").is_none());
}
