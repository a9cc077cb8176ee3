//! Authenticator implementation
//!
//! Obtains access tokens through a [`TokenProvider`], keeps the current one in
//! a [`TokenStore`] and arms a single renewal timer after each success.

use super::provider::TokenProvider;
use super::types::TokenStore;
use crate::error::Error;
use crate::schedule::{Job, JobHandle, Scheduler};
use futures::FutureExt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Default interval between re-authentications (40 minutes)
pub const DEFAULT_REAUTH_INTERVAL: Duration = Duration::from_secs(2400);

/// Keeps a valid access token available for request building.
///
/// Cloning is cheap and shares the same token and timer. At most one renewal
/// is pending at any time; the pending timer is cancelled on [`shutdown`] or
/// when the last handle is dropped.
///
/// Concurrent calls to [`authenticate`] are not serialized here. The owning
/// client runs them one at a time.
///
/// [`shutdown`]: Authenticator::shutdown
/// [`authenticate`]: Authenticator::authenticate
#[derive(Clone)]
pub struct Authenticator {
    shared: Arc<Shared>,
}

struct Shared {
    provider: Arc<dyn TokenProvider>,
    scheduler: Arc<dyn Scheduler>,
    store: TokenStore,
    reauth_interval: Duration,
    pending: Mutex<Option<Box<dyn JobHandle>>>,
}

impl Authenticator {
    /// Create an authenticator.
    ///
    /// A zero `reauth_interval` disables periodic renewal.
    pub fn new(
        provider: Arc<dyn TokenProvider>,
        scheduler: Arc<dyn Scheduler>,
        store: TokenStore,
        reauth_interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                provider,
                scheduler,
                store,
                reauth_interval,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Obtain a token for `scope` and store it.
    ///
    /// On success any pending renewal is cancelled and, if the reauth
    /// interval is non-zero, a new one is armed to call this again. On
    /// failure the error is logged, the stored token is cleared and nothing
    /// is armed.
    pub async fn authenticate(&self, scope: &str) {
        let result = if scope.trim().is_empty() {
            Err(Error::credential("scope must not be empty"))
        } else {
            self.shared.provider.get_access_token(scope).await
        };

        match result {
            Ok(token) => {
                debug!(scope, expires_at = ?token.expires_at, "obtained access token");
                self.shared.store.replace(token).await;
                self.rearm(scope).await;
            }
            Err(e) => {
                error!(scope, error = %e, "error obtaining access token");
                self.shared.store.clear().await;
            }
        }
    }

    async fn rearm(&self, scope: &str) {
        let mut pending = self.shared.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.cancel();
        }

        let interval = self.shared.reauth_interval;
        if !interval.is_zero() {
            let job = renewal_job(Arc::downgrade(&self.shared), scope.to_string());
            *pending = Some(self.shared.scheduler.schedule_once(job, interval));
            debug!(scope, interval_secs = interval.as_secs(), "armed re-authentication");
        }
    }

    /// Whether a renewal is currently waiting to fire
    pub async fn pending_renewal(&self) -> bool {
        self.shared
            .pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| h.is_active())
    }

    /// Cancel any pending renewal
    pub async fn shutdown(&self) {
        if let Some(handle) = self.shared.pending.lock().await.take() {
            handle.cancel();
            info!("cancelled pending re-authentication");
        }
    }

    /// The store this authenticator writes to
    pub fn store(&self) -> &TokenStore {
        &self.shared.store
    }

    /// The token provider, used to derive authorization headers
    pub fn provider(&self) -> &Arc<dyn TokenProvider> {
        &self.shared.provider
    }

    /// Delay between a successful authentication and its renewal
    pub fn reauth_interval(&self) -> Duration {
        self.shared.reauth_interval
    }
}

/// The renewal holds only a weak reference so it never keeps a client alive.
fn renewal_job(shared: Weak<Shared>, scope: String) -> Job {
    Box::new(move || {
        async move {
            if let Some(shared) = shared.upgrade() {
                Authenticator { shared }.authenticate(&scope).await;
            }
        }
        .boxed()
    })
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.cancel();
        }
    }
}
