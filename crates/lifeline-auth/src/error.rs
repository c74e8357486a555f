use lifeline_store::StoreError;
use thiserror::Error;

use crate::provider::{ProviderError, ProviderErrorCode};

/// Which session operation an unexpected failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    AssignRole,
}

impl AuthAction {
    /// Generic message shown when a failure has no more specific mapping.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::SignIn => "Failed to sign in. Please check your credentials.",
            Self::SignUp => "Failed to create account. Please try again.",
            Self::AssignRole => "Failed to save your role. Please try again.",
        }
    }
}

/// Failures returned by the session resolver. `Display` is the message
/// shown to the person at the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No account found with this email address.")]
    AccountNotFound,

    #[error("Incorrect password. Please try again.")]
    WrongCredentials,

    #[error("Invalid email address.")]
    InvalidEmailFormat,

    #[error("This account has been disabled.")]
    AccountDisabled,

    #[error("Too many failed attempts. Please try again later.")]
    RateLimited,

    #[error("Network error. Please check your connection.")]
    NetworkFailure,

    #[error("An account with this email already exists.")]
    EmailAlreadyInUse,

    #[error("Password is too weak. Please use a stronger password.")]
    WeakPassword,

    #[error("Please select a user type.")]
    MissingRoleSelection,

    #[error("You must be signed in to choose a role.")]
    NotAuthenticated,

    /// Anything without a dedicated variant. `message` is usually the
    /// action's generic failure message; `detail` is for logs only.
    #[error("{message}")]
    Unknown {
        action: AuthAction,
        message: &'static str,
        detail: String,
    },
}

impl AuthError {
    /// Map a provider failure raised while signing in.
    #[must_use]
    pub fn sign_in_failure(error: &ProviderError) -> Self {
        match error.code {
            ProviderErrorCode::UserNotFound => Self::AccountNotFound,
            ProviderErrorCode::WrongPassword | ProviderErrorCode::InvalidCredential => {
                Self::WrongCredentials
            }
            ProviderErrorCode::InvalidEmail => Self::InvalidEmailFormat,
            ProviderErrorCode::UserDisabled => Self::AccountDisabled,
            ProviderErrorCode::TooManyRequests => Self::RateLimited,
            ProviderErrorCode::NetworkRequestFailed => Self::NetworkFailure,
            _ => Self::unknown(AuthAction::SignIn, error),
        }
    }

    /// Map a provider failure raised while creating an account.
    #[must_use]
    pub fn sign_up_failure(error: &ProviderError) -> Self {
        match error.code {
            ProviderErrorCode::EmailAlreadyInUse => Self::EmailAlreadyInUse,
            ProviderErrorCode::InvalidEmail => Self::InvalidEmailFormat,
            ProviderErrorCode::WeakPassword => Self::WeakPassword,
            ProviderErrorCode::NetworkRequestFailed => Self::NetworkFailure,
            ProviderErrorCode::OperationNotAllowed => Self::Unknown {
                action: AuthAction::SignUp,
                message: "Email/password accounts are not enabled.",
                detail: error.to_string(),
            },
            _ => Self::unknown(AuthAction::SignUp, error),
        }
    }

    /// Map a role record write failure.
    #[must_use]
    pub fn store_failure(error: &StoreError, action: AuthAction) -> Self {
        if error.is_network() {
            Self::NetworkFailure
        } else {
            Self::unknown(action, error)
        }
    }

    fn unknown(action: AuthAction, detail: &impl ToString) -> Self {
        Self::Unknown {
            action,
            message: action.failure_message(),
            detail: detail.to_string(),
        }
    }
}

/// Failures reading or writing the persisted sign-in credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential store error: {0}")]
    Store(String),

    #[error("stored credential is malformed: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn provider(code: ProviderErrorCode) -> ProviderError {
        ProviderError::new(code, "detail")
    }

    #[rstest]
    #[case(ProviderErrorCode::UserNotFound, AuthError::AccountNotFound)]
    #[case(ProviderErrorCode::WrongPassword, AuthError::WrongCredentials)]
    #[case(ProviderErrorCode::InvalidCredential, AuthError::WrongCredentials)]
    #[case(ProviderErrorCode::InvalidEmail, AuthError::InvalidEmailFormat)]
    #[case(ProviderErrorCode::UserDisabled, AuthError::AccountDisabled)]
    #[case(ProviderErrorCode::TooManyRequests, AuthError::RateLimited)]
    #[case(ProviderErrorCode::NetworkRequestFailed, AuthError::NetworkFailure)]
    fn sign_in_mapping(#[case] code: ProviderErrorCode, #[case] expected: AuthError) {
        assert_eq!(AuthError::sign_in_failure(&provider(code)), expected);
    }

    #[rstest]
    #[case(ProviderErrorCode::EmailAlreadyInUse, AuthError::EmailAlreadyInUse)]
    #[case(ProviderErrorCode::InvalidEmail, AuthError::InvalidEmailFormat)]
    #[case(ProviderErrorCode::WeakPassword, AuthError::WeakPassword)]
    #[case(ProviderErrorCode::NetworkRequestFailed, AuthError::NetworkFailure)]
    fn sign_up_mapping(#[case] code: ProviderErrorCode, #[case] expected: AuthError) {
        assert_eq!(AuthError::sign_up_failure(&provider(code)), expected);
    }

    #[test]
    fn sign_up_codes_do_not_leak_into_sign_in() {
        let err = AuthError::sign_in_failure(&provider(ProviderErrorCode::EmailAlreadyInUse));
        assert_eq!(
            err.to_string(),
            "Failed to sign in. Please check your credentials."
        );
    }

    #[rstest]
    #[case(
        ProviderErrorCode::OperationNotAllowed,
        "Email/password accounts are not enabled."
    )]
    #[case(ProviderErrorCode::Internal, "Failed to create account. Please try again.")]
    fn unmapped_sign_up_codes_are_unknown(#[case] code: ProviderErrorCode, #[case] message: &str) {
        let err = AuthError::sign_up_failure(&provider(code));
        assert!(matches!(
            err,
            AuthError::Unknown {
                action: AuthAction::SignUp,
                ..
            }
        ));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn operation_not_allowed_keeps_the_generic_message_on_sign_in() {
        let err = AuthError::sign_in_failure(&provider(ProviderErrorCode::OperationNotAllowed));
        assert_eq!(
            err.to_string(),
            "Failed to sign in. Please check your credentials."
        );
    }

    #[test]
    fn store_failures_split_on_connectivity() {
        let network = StoreError::Network("offline".into());
        assert_eq!(
            AuthError::store_failure(&network, AuthAction::SignUp),
            AuthError::NetworkFailure
        );

        let denied = StoreError::Status {
            status: 403,
            body: "PERMISSION_DENIED".into(),
        };
        let err = AuthError::store_failure(&denied, AuthAction::AssignRole);
        assert_eq!(err.to_string(), "Failed to save your role. Please try again.");
    }
}
