//! The resolved session view handed to consumers.

use lifeline_core::enums::{Dashboard, Role};
use lifeline_core::identity::AuthUser;
use serde::Serialize;

/// Where the session is in its lifecycle.
///
/// ```text
/// Unresolved ──► Anonymous ◄──► Authenticated
///      └──────────────────────────►┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The provider has not reported yet.
    Unresolved,
    Anonymous,
    Authenticated,
}

/// Outcome of asking whether the session may open a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Still resolving; decide later.
    Pending,
    Granted,
    Denied,
}

/// `(user, role, loading)` as last published by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<AuthUser>,
    pub role: Option<Role>,
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::unresolved(None)
    }
}

impl Session {
    /// Startup state, optionally pre-seeded with a cached role.
    #[must_use]
    pub const fn unresolved(role_hint: Option<Role>) -> Self {
        Self {
            user: None,
            role: role_hint,
            loading: true,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.uid.as_str())
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.loading {
            Phase::Unresolved
        } else if self.user.is_some() {
            Phase::Authenticated
        } else {
            Phase::Anonymous
        }
    }

    /// Signed in but without a role record, e.g. after a sign-up whose
    /// record write failed. Fixed with `SessionResolver::assign_role`.
    #[must_use]
    pub const fn needs_role_selection(&self) -> bool {
        !self.loading && self.user.is_some() && self.role.is_none()
    }

    /// Dashboard to land on.
    #[must_use]
    pub fn home(&self) -> Dashboard {
        match (&self.user, self.role) {
            (Some(_), Some(role)) => role.home(),
            _ => Dashboard::Home,
        }
    }

    #[must_use]
    pub fn access(&self, dashboard: Dashboard) -> Access {
        let Some(required) = dashboard.required_role() else {
            return Access::Granted;
        };
        if self.loading {
            return Access::Pending;
        }
        if self.user.is_some() && self.role == Some(required) {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn signed_in(role: Option<Role>) -> Session {
        Session {
            user: Some(AuthUser::new("u1", None)),
            role,
            loading: false,
        }
    }

    fn anonymous() -> Session {
        Session {
            user: None,
            role: None,
            loading: false,
        }
    }

    #[test]
    fn phases() {
        assert_eq!(Session::default().phase(), Phase::Unresolved);
        assert_eq!(anonymous().phase(), Phase::Anonymous);
        assert_eq!(signed_in(None).phase(), Phase::Authenticated);
    }

    #[rstest]
    #[case(Dashboard::Admin, Some(Role::Admin), Access::Granted)]
    #[case(Dashboard::Admin, Some(Role::Donor), Access::Denied)]
    #[case(Dashboard::Donor, Some(Role::Donor), Access::Granted)]
    #[case(Dashboard::BloodBank, Some(Role::BloodBank), Access::Granted)]
    #[case(Dashboard::BloodBank, Some(Role::User), Access::Denied)]
    #[case(Dashboard::Donor, None, Access::Denied)]
    #[case(Dashboard::Home, None, Access::Granted)]
    fn access_for_signed_in(
        #[case] dashboard: Dashboard,
        #[case] role: Option<Role>,
        #[case] expected: Access,
    ) {
        assert_eq!(signed_in(role).access(dashboard), expected);
    }

    #[test]
    fn loading_session_is_pending_even_with_cached_role() {
        let session = Session::unresolved(Some(Role::Admin));
        assert_eq!(session.access(Dashboard::Admin), Access::Pending);
        assert_eq!(session.access(Dashboard::Home), Access::Granted);
    }

    #[test]
    fn anonymous_is_denied() {
        assert_eq!(anonymous().access(Dashboard::Donor), Access::Denied);
    }

    #[test]
    fn home_follows_role() {
        assert_eq!(signed_in(Some(Role::BloodBank)).home(), Dashboard::BloodBank);
        assert_eq!(signed_in(Some(Role::User)).home(), Dashboard::Home);
        assert_eq!(anonymous().home(), Dashboard::Home);
    }

    #[test]
    fn role_selection_needed_only_when_resolved_without_role() {
        assert!(signed_in(None).needs_role_selection());
        assert!(!signed_in(Some(Role::Donor)).needs_role_selection());
        assert!(!anonymous().needs_role_selection());
        assert!(!Session::default().needs_role_selection());
    }
}
