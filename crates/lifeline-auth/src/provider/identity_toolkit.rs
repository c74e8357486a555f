//! Hosted email/password authentication over the Identity Toolkit REST API.
//!
//! - `accounts:signInWithPassword` and `accounts:signUp` issue an ID token
//!   plus a refresh token
//! - the Secure Token `token` endpoint trades a saved refresh token for a
//!   fresh ID token on startup ([`IdentityToolkitProvider::restore`])
//!
//! The refresh token is persisted through [`credentials`](crate::credentials);
//! the ID token is forwarded to the Firestore backend so document reads run
//! as the signed-in user.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use lifeline_config::FirebaseConfig;
use lifeline_core::identity::AuthUser;
use lifeline_store::FirestoreStore;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{AuthProvider, AuthStateHub, AuthSubscription, ProviderError, ProviderErrorCode};
use crate::credentials::{self, StoredCredentials};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
}

/// The Secure Token API answers in `snake_case`.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map a REST error message (`WEAK_PASSWORD : Password should be ...`) to a
/// provider code.
fn code_for(message: &str) -> ProviderErrorCode {
    let key = message.split([' ', ':']).next().unwrap_or(message);
    match key {
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => ProviderErrorCode::UserNotFound,
        "INVALID_PASSWORD" => ProviderErrorCode::WrongPassword,
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_REFRESH_TOKEN" | "TOKEN_EXPIRED" => {
            ProviderErrorCode::InvalidCredential
        }
        "USER_DISABLED" => ProviderErrorCode::UserDisabled,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => ProviderErrorCode::TooManyRequests,
        "EMAIL_EXISTS" => ProviderErrorCode::EmailAlreadyInUse,
        "WEAK_PASSWORD" => ProviderErrorCode::WeakPassword,
        "INVALID_EMAIL" | "MISSING_EMAIL" => ProviderErrorCode::InvalidEmail,
        "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
            ProviderErrorCode::OperationNotAllowed
        }
        _ => ProviderErrorCode::Internal,
    }
}

pub struct IdentityToolkitProvider {
    client: reqwest::Client,
    identity_url: String,
    token_url: String,
    api_key: String,
    hub: AuthStateHub,
    id_token: RwLock<Option<String>>,
    firestore: Option<Arc<FirestoreStore>>,
    persist: bool,
}

impl IdentityToolkitProvider {
    /// Build a provider. No state is published until [`restore`](Self::restore).
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            identity_url: config.identity_toolkit_url.trim_end_matches('/').to_string(),
            token_url: config.secure_token_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            hub: AuthStateHub::new(),
            id_token: RwLock::new(None),
            firestore: None,
            persist: true,
        }
    }

    /// Forward ID tokens to `store` whenever the signed-in user changes.
    #[must_use]
    pub fn with_firestore(mut self, store: Arc<FirestoreStore>) -> Self {
        self.firestore = Some(store);
        self
    }

    /// Never read or write the saved credential.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Current ID token, if signed in.
    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        self.id_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Determine the initial state from the saved credential and publish it.
    ///
    /// A credential that can no longer be refreshed resolves to signed out.
    pub async fn restore(&self) {
        let saved = if self.persist { credentials::load() } else { None };
        let state = match saved {
            None => None,
            Some(saved) => match self.refresh(&saved.refresh_token).await {
                Ok(refreshed) => Some(self.establish(
                    refreshed.user_id,
                    saved.email,
                    refreshed.id_token,
                    refreshed.refresh_token,
                )),
                Err(error) => {
                    tracing::warn!(%error, uid = %saved.uid, "could not restore saved session");
                    None
                }
            },
        };
        self.hub.publish(state);
    }

    fn endpoint(&self, base: &str, path: &str) -> String {
        format!("{base}/{path}?key={}", urlencoding::encode(&self.api_key))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request.send().await.map_err(|e| {
            ProviderError::new(ProviderErrorCode::NetworkRequestFailed, e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&body)
                .map_or(ProviderErrorCode::Internal, |e| code_for(&e.error.message));
            return Err(ProviderError::new(code, format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorCode::Internal, format!("decode: {e}")))
    }

    async fn password_call(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let account: AccountResponse = self
            .call(
                self.client
                    .post(self.endpoint(&self.identity_url, path))
                    .json(&body),
            )
            .await?;

        let email = account.email.or_else(|| Some(email.to_string()));
        let user = self.establish(account.local_id, email, account.id_token, account.refresh_token);
        self.hub.publish(Some(user.clone()));
        Ok(user)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ProviderError> {
        let form = format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoding::encode(refresh_token)
        );
        self.call(
            self.client
                .post(self.endpoint(&self.token_url, "token"))
                .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(form),
        )
        .await
    }

    /// Install the tokens of a freshly signed-in user.
    fn establish(
        &self,
        uid: String,
        email: Option<String>,
        id_token: String,
        refresh_token: String,
    ) -> AuthUser {
        self.install_token(Some(id_token));
        if self.persist {
            let saved = StoredCredentials {
                uid: uid.clone(),
                email: email.clone(),
                refresh_token,
            };
            if let Err(error) = credentials::store(&saved) {
                tracing::warn!(%error, "failed to persist credential; session will not survive restart");
            }
        }
        AuthUser::new(uid, email)
    }

    fn install_token(&self, token: Option<String>) {
        if let Some(store) = &self.firestore {
            store.set_id_token(token.clone());
        }
        *self.id_token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitProvider {
    fn subscribe(&self) -> AuthSubscription {
        self.hub.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        self.password_call("accounts:signInWithPassword", email, password)
            .await
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        self.password_call("accounts:signUp", email, password).await
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.install_token(None);
        let removed = if self.persist {
            credentials::delete()
                .map_err(|e| ProviderError::new(ProviderErrorCode::Internal, e.to_string()))
        } else {
            Ok(())
        };
        self.hub.publish(None);
        removed
    }
}
