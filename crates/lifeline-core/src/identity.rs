use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Signed-in principal as issued by the authentication provider.
///
/// Produced by `lifeline-auth` providers, carried inside the resolved session.
/// Contains only data fields, no provider calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AuthUser {
    /// Opaque provider user id. Also the document key in every collection.
    pub uid: String,
    /// Email the account was registered with, when the provider reports it.
    pub email: Option<String>,
}

impl AuthUser {
    #[must_use]
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}
