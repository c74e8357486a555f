//! Hosted authentication and document database configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_identity_toolkit_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".into()
}

fn default_secure_token_url() -> String {
    "https://securetoken.googleapis.com/v1".into()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".into()
}

fn default_database() -> String {
    "(default)".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirebaseConfig {
    /// Web API key of the project.
    #[serde(default)]
    pub api_key: String,

    /// Auth domain (e.g. `blood-lifeline-now.firebaseapp.com`).
    #[serde(default)]
    pub auth_domain: String,

    /// Project id owning the document database.
    #[serde(default)]
    pub project_id: String,

    /// Database id inside the project.
    #[serde(default = "default_database")]
    pub database: String,

    /// Identity Toolkit REST base URL.
    #[serde(default = "default_identity_toolkit_url")]
    pub identity_toolkit_url: String,

    /// Secure Token REST base URL (refresh grant).
    #[serde(default = "default_secure_token_url")]
    pub secure_token_url: String,

    /// Firestore REST base URL.
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            auth_domain: String::new(),
            project_id: String::new(),
            database: default_database(),
            identity_toolkit_url: default_identity_toolkit_url(),
            secure_token_url: default_secure_token_url(),
            firestore_url: default_firestore_url(),
        }
    }
}

impl FirebaseConfig {
    /// Check if the minimum fields for sign-in and document access are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.project_id.is_empty()
    }

    /// Fail with [`ConfigError::NotConfigured`] unless [`is_configured`](Self::is_configured).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `api_key` or `project_id` is empty.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let missing: Vec<&'static str> = [
            ("api_key", self.api_key.is_empty()),
            ("project_id", self.project_id.is_empty()),
        ]
        .into_iter()
        .filter_map(|(field, empty)| empty.then_some(field))
        .collect();

        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "firebase",
                missing,
            })
        }
    }

    /// Document root for REST calls, e.g.
    /// `https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents`.
    #[must_use]
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.firestore_url.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }
}
