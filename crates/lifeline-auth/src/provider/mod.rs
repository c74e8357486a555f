//! The authentication provider seam.
//!
//! A provider issues identities and pushes its auth state to subscribers:
//!
//! ```text
//! subscribe() ──► AuthSubscription ──recv()──► Some(AuthUser) | None ...
//!                   (current state first, once the provider knows it)
//! ```
//!
//! Every subscriber owns an unbounded channel. Dropping the subscription
//! (or calling [`AuthSubscription::unsubscribe`]) detaches it; the provider
//! prunes closed channels on its next publish.

pub mod identity_toolkit;
pub mod memory;

use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use lifeline_core::identity::AuthUser;
use thiserror::Error;
use tokio::sync::mpsc;

pub use identity_toolkit::IdentityToolkitProvider;
pub use memory::MemoryAuthProvider;

/// What a provider reports: signed in as someone, or signed out.
pub type AuthState = Option<AuthUser>;

/// Closed vocabulary of provider failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    InvalidEmail,
    UserDisabled,
    TooManyRequests,
    NetworkRequestFailed,
    EmailAlreadyInUse,
    WeakPassword,
    OperationNotAllowed,
    Internal,
}

impl ProviderErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::InvalidCredential => "auth/invalid-credential",
            Self::InvalidEmail => "auth/invalid-email",
            Self::UserDisabled => "auth/user-disabled",
            Self::TooManyRequests => "auth/too-many-requests",
            Self::NetworkRequestFailed => "auth/network-request-failed",
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::WeakPassword => "auth/weak-password",
            Self::OperationNotAllowed => "auth/operation-not-allowed",
            Self::Internal => "auth/internal-error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {detail}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub detail: String,
}

impl ProviderError {
    #[must_use]
    pub fn new(code: ProviderErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Hosted authentication service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register for auth state changes. The current state is delivered first
    /// as soon as the provider knows it.
    fn subscribe(&self) -> AuthSubscription;

    /// Sign in with email and password. On success the new state is also
    /// pushed to every subscriber.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError>;

    /// Create an email/password account. The new account is signed in.
    async fn create_account(&self, email: &str, password: &str)
    -> Result<AuthUser, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}

/// Receiving end of a provider subscription.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: Option<mpsc::UnboundedReceiver<AuthState>>,
}

impl AuthSubscription {
    #[must_use]
    pub const fn new(rx: mpsc::UnboundedReceiver<AuthState>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Next state change. `None` once unsubscribed or the provider is gone.
    pub async fn recv(&mut self) -> Option<AuthState> {
        match self.rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Stop receiving. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(mut rx) = self.rx.take() {
            rx.close();
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.rx.is_some()
    }
}

#[derive(Debug, Default)]
struct HubInner {
    /// `None` until the provider has determined its first state.
    current: Option<AuthState>,
    subscribers: Vec<mpsc::UnboundedSender<AuthState>>,
}

/// Fan-out of auth state to subscribers, shared by provider implementations.
#[derive(Debug, Default)]
pub struct AuthStateHub {
    inner: Mutex<HubInner>,
}

impl AuthStateHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> AuthSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        if let Some(state) = &inner.current {
            let _ = tx.send(state.clone());
        }
        inner.subscribers.push(tx);
        AuthSubscription::new(rx)
    }

    /// Record `state` as current and push it to every live subscriber.
    pub fn publish(&self, state: AuthState) {
        let mut inner = self.lock();
        inner.current = Some(state.clone());
        inner
            .subscribers
            .retain(|tx| tx.send(state.clone()).is_ok());
        tracing::debug!(
            signed_in = state.is_some(),
            subscribers = inner.subscribers.len(),
            "auth state published"
        );
    }

    /// Last published state, `None` if nothing was published yet.
    #[must_use]
    pub fn current(&self) -> Option<AuthState> {
        self.lock().current.clone()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }
}
