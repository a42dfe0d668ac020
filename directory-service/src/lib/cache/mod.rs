use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

use crate::domain::user::models::User;
use crate::user::errors::StoreError;
use crate::user::ports::UserStore;

/// In-memory, periodically refreshed view of the user store.
///
/// Serves constant-time lookups by login without touching the store on the
/// hot path. The snapshot is an immutable map replaced wholesale on every
/// refresh: a reader observes either the fully-old or the fully-new mapping,
/// never a partially-populated one. A failed refresh keeps the previous
/// snapshot visible and is retried on the next tick.
pub struct UserDirectory<S>
where
    S: UserStore,
{
    store: Arc<S>,
    snapshot: RwLock<Arc<HashMap<String, User>>>,
    shutdown: watch::Sender<bool>,
}

impl<S> UserDirectory<S>
where
    S: UserStore,
{
    /// Build the directory and start its refresh loop.
    ///
    /// The first load runs synchronously: once this returns, the directory is
    /// populated. A background task then repeats the load every
    /// `refresh_interval` until [`stop`](Self::stop) is called.
    ///
    /// # Errors
    /// * `StoreError` - The initial load failed; the directory is not
    ///   constructed
    pub async fn load(store: Arc<S>, refresh_interval: Duration) -> Result<Arc<Self>, StoreError> {
        let initial = Self::build_snapshot(store.as_ref()).await?;
        tracing::info!(users = initial.len(), "user directory loaded");

        let (shutdown, shutdown_rx) = watch::channel(false);
        let directory = Arc::new(Self {
            store,
            snapshot: RwLock::new(Arc::new(initial)),
            shutdown,
        });

        tokio::spawn(Self::refresh_loop(
            Arc::clone(&directory),
            refresh_interval,
            shutdown_rx,
        ));

        Ok(directory)
    }

    /// Look up a user by login in the current snapshot.
    ///
    /// Never fails: an unknown login is `None`, not an error. Does not touch
    /// the store.
    pub async fn get_by_login(&self, login: &str) -> Option<User> {
        let snapshot = self.snapshot.read().await;
        snapshot.get(login).cloned()
    }

    /// Reload the snapshot from the store once.
    ///
    /// # Errors
    /// * `StoreError` - The load failed; the previous snapshot stays visible
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let fresh = Self::build_snapshot(self.store.as_ref()).await?;
        let mut snapshot = self.snapshot.write().await;
        *snapshot = Arc::new(fresh);
        Ok(())
    }

    /// Halt the periodic refresh schedule. Idempotent.
    ///
    /// A refresh already in flight is not cancelled; it completes and its
    /// snapshot becomes visible, after which the loop exits.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    async fn refresh_loop(
        directory: Arc<Self>,
        refresh_interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(refresh_interval);
        // A slow refresh skips the next tick instead of queueing it;
        // staleness stays bounded by the interval either way.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately and the initial load already
        // happened, so consume it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = directory.refresh().await {
                        tracing::error!(error = %err, "unable to update user directory from store");
                    }
                }
                _ = shutdown.changed() => {
                    tracing::debug!("user directory refresh loop stopped");
                    return;
                }
            }
        }
    }

    async fn build_snapshot(store: &S) -> Result<HashMap<String, User>, StoreError> {
        let users = store.list_all().await?;
        Ok(users
            .into_iter()
            .map(|user| (user.login.as_str().to_string(), user))
            .collect())
    }
}
