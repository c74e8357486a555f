//! In-process [`AuthProvider`] used by tests and offline demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use lifeline_core::identity::AuthUser;

use super::{AuthProvider, AuthState, AuthStateHub, AuthSubscription, ProviderError, ProviderErrorCode};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
    disabled: bool,
}

/// Email/password accounts held in memory.
///
/// New accounts get sequential ids `u1`, `u2`, ... Like the hosted
/// provider, a successful sign-in or account creation is pushed to every
/// subscriber before the call returns.
#[derive(Debug)]
pub struct MemoryAuthProvider {
    hub: AuthStateHub,
    accounts: Mutex<HashMap<String, Account>>,
    next_uid: AtomicUsize,
    fail_next: Mutex<Option<ProviderErrorCode>>,
    calls: AtomicUsize,
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthProvider {
    /// A provider that already knows nobody is signed in.
    #[must_use]
    pub fn new() -> Self {
        let provider = Self::pending();
        provider.hub.publish(None);
        provider
    }

    /// A provider that has not determined its initial state yet. Nothing
    /// is delivered to subscribers until [`emit`](Self::emit) is called.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            hub: AuthStateHub::new(),
            accounts: Mutex::new(HashMap::new()),
            next_uid: AtomicUsize::new(1),
            fail_next: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register an account directly, without signing it in.
    pub fn add_account(&self, email: &str, password: &str) -> AuthUser {
        let uid = self.allocate_uid();
        self.lock_accounts().insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
                disabled: false,
            },
        );
        AuthUser::new(uid, Some(email.to_string()))
    }

    pub fn disable(&self, email: &str) {
        if let Some(account) = self.lock_accounts().get_mut(email) {
            account.disabled = true;
        }
    }

    /// Make the next provider call fail with `code`.
    pub fn fail_next(&self, code: ProviderErrorCode) {
        *self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(code);
    }

    /// Push an arbitrary state, as the hosted provider does on token
    /// refresh or session restore.
    pub fn emit(&self, state: AuthState) {
        self.hub.publish(state);
    }

    /// Number of sign-in, create-account and sign-out calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    fn allocate_uid(&self) -> String {
        format!("u{}", self.next_uid.fetch_add(1, Ordering::SeqCst))
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_call(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match injected {
            Some(code) => Err(ProviderError::new(code, "injected failure")),
            None => Ok(()),
        }
    }
}

fn check_email(email: &str) -> Result<(), ProviderError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(ProviderError::new(
            ProviderErrorCode::InvalidEmail,
            format!("'{email}' is not an email address"),
        ))
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    fn subscribe(&self) -> AuthSubscription {
        self.hub.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        self.begin_call()?;
        check_email(email)?;

        let account = self.lock_accounts().get(email).cloned().ok_or_else(|| {
            ProviderError::new(ProviderErrorCode::UserNotFound, format!("no account for {email}"))
        })?;
        if account.password != password {
            return Err(ProviderError::new(
                ProviderErrorCode::WrongPassword,
                "password mismatch",
            ));
        }
        if account.disabled {
            return Err(ProviderError::new(
                ProviderErrorCode::UserDisabled,
                format!("{email} is disabled"),
            ));
        }

        let user = AuthUser::new(account.uid, Some(email.to_string()));
        self.hub.publish(Some(user.clone()));
        Ok(user)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        self.begin_call()?;
        check_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new(
                ProviderErrorCode::WeakPassword,
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.lock_accounts().contains_key(email) {
            return Err(ProviderError::new(
                ProviderErrorCode::EmailAlreadyInUse,
                format!("{email} is taken"),
            ));
        }

        let user = self.add_account(email, password);
        self.hub.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.begin_call()?;
        self.hub.publish(None);
        Ok(())
    }
}
