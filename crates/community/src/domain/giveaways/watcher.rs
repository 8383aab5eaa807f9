use log::{debug, error, info};
use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::GiveawayStore;
use crate::infra::backend::{Backend, Error};

/// Keeps the giveaway store in step with the backend.
///
/// Fetches once right away, then every `sync_interval` measured from when each poll started,
/// until the token is cancelled. A poll outlasting the interval pushes the schedule back.
pub struct GiveawayWatcher {
    backend: Arc<dyn Backend>,
    store: GiveawayStore,
    sync_interval: Duration,
    cancel_token: CancellationToken,
}

impl GiveawayWatcher {
    pub fn new(
        backend: Arc<dyn Backend>,
        store: GiveawayStore,
        cancel_token: CancellationToken,
        sync_interval: Duration,
    ) -> Self {
        Self {
            backend,
            store,
            sync_interval,
            cancel_token,
        }
    }

    pub async fn watch(&self) -> Result<(), anyhow::Error> {
        info!("Starting giveaway watcher");
        let mut ticker = interval(self.sync_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => {
                    info!("Giveaway watcher cancelled while waiting");
                    break;
                }
                _ = ticker.tick() => {}
            }

            // a poll still in flight at shutdown is dropped, its result never reaches the store
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => {
                    info!("Giveaway watcher cancelled during refresh");
                    break;
                }
                _ = self.sync() => {}
            }
        }

        Ok(())
    }

    /// One poll tick: giveaways, then the community figures
    async fn sync(&self) {
        if let Err(e) = refresh_giveaways(self.backend.as_ref(), &self.store).await {
            error!("Error fetching giveaways: {}", e);
        }

        match self.backend.stats().await {
            Ok(stats) => self.store.set_stats(Some(stats)).await,
            Err(e) => {
                debug!("Community stats unavailable: {}", e);
                self.store.set_stats(None).await;
            }
        }
    }
}

/// Fetches the full list and swaps it into the store, a failed fetch leaves the cache as it was
pub async fn refresh_giveaways(backend: &dyn Backend, store: &GiveawayStore) -> Result<(), Error> {
    let giveaways = backend.list_giveaways().await?;
    debug!("Fetched {} giveaways", giveaways.len());
    store.replace(giveaways).await;
    Ok(())
}
