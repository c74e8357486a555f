use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use lifeline_auth::{Access, IdentityToolkitProvider, Session, SessionResolver};
use lifeline_cache::{FileCache, LocalCache};
use lifeline_config::LifelineConfig;
use lifeline_core::enums::Dashboard;
use lifeline_core::identity::AuthUser;
use lifeline_store::{BloodBankRepo, DocumentStore, DonorRepo, FirestoreStore, UserRepo};

use crate::cli::GlobalFlags;

/// Open the on-disk key-value cache.
pub fn open_cache(config: &LifelineConfig) -> anyhow::Result<Arc<dyn LocalCache>> {
    let path = config
        .cache
        .file_path()
        .context("cannot determine local cache location; set LIFELINE_CACHE__DIR")?;
    tracing::debug!(path = %path.display(), "opening local cache");
    Ok(Arc::new(FileCache::new(path)))
}

/// Shared resources for commands that talk to the hosted backend.
pub struct AppContext {
    pub cache: Arc<dyn LocalCache>,
    pub resolver: SessionResolver,
    pub donors: DonorRepo,
    pub banks: BloodBankRepo,
    default_limit: u32,
    resolve_timeout: Duration,
}

impl AppContext {
    /// Wire the provider, the document store, and the session resolver, then
    /// restore any saved sign-in and wait for the first resolved session.
    pub async fn init(config: &LifelineConfig) -> anyhow::Result<Self> {
        let firebase = config.firebase.require()?;

        let firestore = Arc::new(FirestoreStore::new(firebase));
        let docs: Arc<dyn DocumentStore> = firestore.clone();
        let provider = Arc::new(IdentityToolkitProvider::new(firebase).with_firestore(firestore));
        let cache = open_cache(config)?;

        let resolver = SessionResolver::start(
            provider.clone(),
            Arc::new(UserRepo::new(Arc::clone(&docs))),
            Arc::clone(&cache),
        );
        provider.restore().await;

        let ctx = Self {
            cache,
            resolver,
            donors: DonorRepo::new(Arc::clone(&docs)),
            banks: BloodBankRepo::new(docs),
            default_limit: config.general.default_limit,
            resolve_timeout: Duration::from_secs(config.general.resolve_timeout_secs),
        };
        ctx.settle(|s| !s.loading).await?;
        Ok(ctx)
    }

    /// Wait until the published session satisfies `ready`.
    pub async fn settle(&self, ready: impl Fn(&Session) -> bool) -> anyhow::Result<Session> {
        let mut rx = self.resolver.subscribe();
        let waited = tokio::time::timeout(self.resolve_timeout, rx.wait_for(|s| ready(s))).await;
        match waited {
            Ok(Ok(session)) => Ok(session.clone()),
            Ok(Err(_)) => bail!("session resolver stopped unexpectedly"),
            Err(_) => bail!(
                "timed out after {}s waiting for the session to resolve",
                self.resolve_timeout.as_secs()
            ),
        }
    }

    /// Signed-in user allowed to open `dashboard`, or an error naming
    /// where the current session belongs instead.
    pub fn require_access(&self, dashboard: Dashboard) -> anyhow::Result<AuthUser> {
        let session = self.resolver.session();
        match session.access(dashboard) {
            Access::Granted => session
                .user
                .context("this command needs a signed-in account; run `lifeline auth login`"),
            Access::Pending => bail!("session is still resolving; try again"),
            Access::Denied => bail!("{}", denial_message(&session, dashboard)),
        }
    }

    #[must_use]
    pub fn limit(&self, flags: &GlobalFlags) -> u32 {
        flags.limit.unwrap_or(self.default_limit)
    }
}

fn denial_message(session: &Session, dashboard: Dashboard) -> String {
    match (&session.user, session.role) {
        (None, _) => format!("{dashboard} requires sign-in; run `lifeline auth login`"),
        (Some(_), None) => format!(
            "{dashboard} requires a role; run `lifeline auth choose-role --role <donor|blood_bank|admin>`"
        ),
        (Some(_), Some(role)) => format!(
            "{dashboard} is not available to the {role} role; your dashboard is {}",
            role.home()
        ),
    }
}
