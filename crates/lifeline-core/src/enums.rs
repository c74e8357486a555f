//! Roles, dashboards, and blood groups.
//!
//! Roles serialize as `snake_case` (`blood_bank`), the exact tags stored in
//! the `users` collection and the local session cache. Blood groups serialize
//! with their clinical spelling (`AB+`, `O-`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role tag deciding which dashboard a principal may open.
///
/// `User` exists in stored records but is never assigned by sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    BloodBank,
    Admin,
    User,
}

impl Role {
    /// Roles a person can pick when registering.
    pub const ASSIGNABLE: [Self; 3] = [Self::Donor, Self::BloodBank, Self::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::BloodBank => "blood_bank",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Whether this role can be selected at sign-up (and trusted from cache).
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Dashboard a principal with this role lands on after signing in.
    #[must_use]
    pub const fn home(self) -> Dashboard {
        match self {
            Self::Admin => Dashboard::Admin,
            Self::Donor => Dashboard::Donor,
            Self::BloodBank => Dashboard::BloodBank,
            Self::User => Dashboard::Home,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Self::Donor),
            "blood_bank" => Ok(Self::BloodBank),
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(CoreError::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Navigable areas of the application.
///
/// ```text
/// Home       : public
/// Admin      : admin only
/// Donor      : donor only
/// BloodBank  : blood_bank only
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    Home,
    Admin,
    Donor,
    BloodBank,
}

impl Dashboard {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Admin => "/admin",
            Self::Donor => "/donor-dashboard",
            Self::BloodBank => "/blood-bank-dashboard",
        }
    }

    /// Role needed to open this dashboard. `None` means public.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Home => None,
            Self::Admin => Some(Role::Admin),
            Self::Donor => Some(Role::Donor),
            Self::BloodBank => Some(Role::BloodBank),
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// BloodGroup
// ---------------------------------------------------------------------------

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = CoreError;

    /// Accepts the clinical spelling in any letter case, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "blood group",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Donor, "donor")]
    #[case(Role::BloodBank, "blood_bank")]
    #[case(Role::Admin, "admin")]
    #[case(Role::User, "user")]
    fn role_string_forms_agree(#[case] role: Role, #[case] tag: &str) {
        assert_eq!(role.as_str(), tag);
        assert_eq!(tag.parse::<Role>().expect("parse"), role);
        assert_eq!(
            serde_json::to_value(role).expect("serialize"),
            serde_json::json!(tag)
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("superuser"));
    }

    #[test]
    fn user_role_is_not_assignable() {
        assert!(!Role::User.is_assignable());
        assert!(Role::ASSIGNABLE.iter().all(|role| role.is_assignable()));
    }

    #[rstest]
    #[case(Role::Admin, Dashboard::Admin)]
    #[case(Role::Donor, Dashboard::Donor)]
    #[case(Role::BloodBank, Dashboard::BloodBank)]
    #[case(Role::User, Dashboard::Home)]
    fn role_home_dashboards(#[case] role: Role, #[case] dashboard: Dashboard) {
        assert_eq!(role.home(), dashboard);
    }

    #[test]
    fn dashboards_require_their_own_role() {
        for role in Role::ASSIGNABLE {
            assert_eq!(role.home().required_role(), Some(role));
        }
        assert_eq!(Dashboard::Home.required_role(), None);
    }

    #[rstest]
    #[case("A+", BloodGroup::APositive)]
    #[case("ab-", BloodGroup::AbNegative)]
    #[case(" O- ", BloodGroup::ONegative)]
    fn blood_group_parses_loosely(#[case] input: &str, #[case] expected: BloodGroup) {
        assert_eq!(input.parse::<BloodGroup>().expect("parse"), expected);
    }

    #[test]
    fn blood_group_rejects_unknown() {
        assert!("C+".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn blood_group_serializes_clinical_spelling() {
        assert_eq!(
            serde_json::to_value(BloodGroup::AbPositive).expect("serialize"),
            serde_json::json!("AB+")
        );
    }
}
