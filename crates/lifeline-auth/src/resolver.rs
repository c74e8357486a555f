//! Session resolver: one task reconciling provider state with role records.
//!
//! ```text
//! provider ──AuthSubscription──┐
//!                              ├──► reconcile ──► watch<Session> ──► consumers
//! refresh commands ────────────┘        │
//!                                       ├──► RoleStore::get
//!                                       └──► session snapshot (local cache)
//! ```
//!
//! Events are applied one at a time, in order. The local cache is read once
//! at startup to pre-seed the role; every reconciliation overwrites it.
//!
//! Sign-out goes through the same owner of the session and snapshot. It
//! bumps an epoch under the session lock, and a reconciliation that started
//! under an older epoch publishes nothing, so a role lookup that finishes
//! after sign-out cannot bring the user back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lifeline_cache::{LocalCache, SessionSnapshotStore};
use lifeline_core::enums::Role;
use lifeline_store::{RoleRecordFields, RoleStore, WriteMode};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::error::{AuthAction, AuthError};
use crate::provider::{AuthProvider, AuthState, AuthSubscription};
use crate::session::Session;

enum Command {
    /// Re-run reconciliation for the provider's latest state, then ack.
    Refresh(oneshot::Sender<()>),
    /// The user signed out locally; later refreshes resolve to anonymous
    /// until the provider reports again.
    SignedOut,
}

/// Sole writer of the published session and the cached snapshot.
struct Reconciler {
    roles: Arc<dyn RoleStore>,
    snapshot: SessionSnapshotStore,
    session: watch::Sender<Session>,
    epoch: AtomicU64,
}

impl Reconciler {
    /// Apply `update` under the session lock unless a sign-out happened
    /// since `epoch` was read. Returns whether anything was published.
    fn publish(&self, epoch: u64, update: impl FnOnce(&mut Session)) -> bool {
        self.session.send_if_modified(|s| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            update(s);
            true
        })
    }

    async fn apply(&self, state: AuthState) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let Some(user) = state else {
            self.publish(epoch, |s| {
                self.snapshot.clear();
                *s = Session {
                    user: None,
                    role: None,
                    loading: false,
                };
            });
            tracing::debug!("session resolved: anonymous");
            return;
        };

        // The user is visible before the role lookup completes.
        if !self.publish(epoch, |s| s.user = Some(user.clone())) {
            return;
        }

        let role = match self.roles.get(&user.uid).await {
            Ok(record) => record.map(|r| r.role),
            Err(error) => {
                tracing::warn!(%error, uid = %user.uid, "role lookup failed; continuing without a role");
                None
            }
        };

        let published = self.publish(epoch, |s| {
            self.snapshot.save(&user.uid, role);
            *s = Session {
                user: Some(user.clone()),
                role,
                loading: false,
            };
        });
        if published {
            tracing::debug!(uid = %user.uid, role = ?role, "session resolved: authenticated");
        } else {
            tracing::debug!(uid = %user.uid, "signed out during role lookup; result discarded");
        }
    }

    /// Forget the user now, whether or not a reconciliation is in flight.
    /// `loading` is left as it is.
    fn sign_out(&self) {
        self.session.send_modify(|s| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.snapshot.clear();
            s.user = None;
            s.role = None;
        });
    }

    async fn run(
        self: Arc<Self>,
        mut subscription: AuthSubscription,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        // `None` until the provider has reported once.
        let mut latest: Option<AuthState> = None;
        loop {
            tokio::select! {
                biased;
                event = subscription.recv() => {
                    let Some(state) = event else {
                        tracing::debug!("provider stream closed; resolver stopping");
                        break;
                    };
                    latest = Some(state.clone());
                    self.apply(state).await;
                }
                Some(command) = commands.recv() => match command {
                    Command::Refresh(ack) => {
                        if let Some(state) = latest.clone() {
                            self.apply(state).await;
                        }
                        let _ = ack.send(());
                    }
                    Command::SignedOut => latest = Some(None),
                },
            }
        }
    }
}

/// Owns the session: start it, read or watch it, drive sign-in/up/out.
///
/// Must be started inside a Tokio runtime. Dropping the resolver shuts it
/// down.
pub struct SessionResolver {
    provider: Arc<dyn AuthProvider>,
    roles: Arc<dyn RoleStore>,
    reconciler: Arc<Reconciler>,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl SessionResolver {
    /// Read the cached snapshot once, subscribe to the provider, and spawn
    /// the reconciliation task.
    #[must_use]
    pub fn start(
        provider: Arc<dyn AuthProvider>,
        roles: Arc<dyn RoleStore>,
        cache: Arc<dyn LocalCache>,
    ) -> Self {
        let snapshot = SessionSnapshotStore::new(cache);
        let hint = snapshot.load().map(|cached| cached.role);
        if let Some(role) = hint {
            tracing::debug!(%role, "pre-seeding role from cache");
        }

        let (session, _) = watch::channel(Session::unresolved(hint));
        let (commands, command_rx) = mpsc::unbounded_channel();

        let reconciler = Arc::new(Reconciler {
            roles: Arc::clone(&roles),
            snapshot,
            session,
            epoch: AtomicU64::new(0),
        });
        let task = tokio::spawn(Arc::clone(&reconciler).run(provider.subscribe(), command_rx));

        Self {
            provider,
            roles,
            reconciler,
            commands,
            task,
        }
    }

    /// Current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.reconciler.session.borrow().clone()
    }

    /// Watch the session for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.reconciler.session.subscribe()
    }

    /// Wait for the first provider report to be reconciled.
    pub async fn wait_until_resolved(&self) -> Session {
        let mut rx = self.subscribe();
        if let Ok(session) = rx.wait_for(|s| !s.loading).await {
            return session.clone();
        }
        self.session()
    }

    /// Sign in with email and password.
    ///
    /// The session is updated by the provider's state push, not here.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`AuthError`] if the provider rejects the sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(user) => {
                tracing::debug!(uid = %user.uid, "provider accepted sign-in");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(code = %error.code, detail = %error.detail, "sign-in rejected");
                Err(AuthError::sign_in_failure(&error))
            }
        }
    }

    /// Create an account and write its role record.
    ///
    /// The two steps are not atomic. If the record write fails the account
    /// stays signed in without a role; see [`Session::needs_role_selection`].
    ///
    /// # Errors
    ///
    /// `MissingRoleSelection` without a selectable role (nothing is called),
    /// the mapped provider failure, or the mapped store failure.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> Result<(), AuthError> {
        let Some(role) = role.filter(|r| r.is_assignable()) else {
            return Err(AuthError::MissingRoleSelection);
        };

        let user = self
            .provider
            .create_account(email, password)
            .await
            .map_err(|error| {
                tracing::warn!(code = %error.code, detail = %error.detail, "sign-up rejected");
                AuthError::sign_up_failure(&error)
            })?;

        let fields = RoleRecordFields {
            role,
            display_name: display_name.to_string(),
            email: user.email.clone().unwrap_or_else(|| email.to_string()),
        };
        self.write_role(&user.uid, fields, AuthAction::SignUp).await?;

        self.refresh().await;
        Ok(())
    }

    /// Sign out. The session and snapshot are reset even if the provider
    /// call fails, and a role lookup still in flight is discarded.
    pub async fn sign_out(&self) {
        if let Err(error) = self.provider.sign_out().await {
            tracing::warn!(%error, "provider sign-out failed; clearing local session anyway");
        }
        self.reconciler.sign_out();
        let _ = self.commands.send(Command::SignedOut);
    }

    /// Write a role record for the signed-in user and re-resolve.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when nobody is signed in, `MissingRoleSelection`
    /// for a role that cannot be selected, or the mapped store failure.
    pub async fn assign_role(&self, role: Role, display_name: &str) -> Result<(), AuthError> {
        let Some(user) = self.session().user else {
            return Err(AuthError::NotAuthenticated);
        };
        if !role.is_assignable() {
            return Err(AuthError::MissingRoleSelection);
        }

        let fields = RoleRecordFields {
            role,
            display_name: display_name.to_string(),
            email: user.email.clone().unwrap_or_default(),
        };
        self.write_role(&user.uid, fields, AuthAction::AssignRole)
            .await?;

        self.refresh().await;
        Ok(())
    }

    /// Stop reconciling. An in-flight role lookup is abandoned and its
    /// result never published. Idempotent.
    pub fn shutdown(&self) {
        if !self.task.is_finished() {
            tracing::debug!("session resolver shutting down");
        }
        self.task.abort();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    async fn write_role(
        &self,
        uid: &str,
        fields: RoleRecordFields,
        action: AuthAction,
    ) -> Result<(), AuthError> {
        self.roles
            .set(uid, fields, WriteMode::Merge)
            .await
            .map_err(|error| {
                tracing::warn!(%error, uid, "role record write failed");
                AuthError::store_failure(&error, action)
            })
    }

    /// Reconcile the provider's latest state again and wait until the
    /// result is published. Provider events already queued are applied
    /// first.
    pub async fn refresh(&self) {
        let (ack, done) = oneshot::channel();
        if self.commands.send(Command::Refresh(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

impl Drop for SessionResolver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
