use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{CommunityStats, Giveaway};

/// Cached copy of the backend's giveaway list.
///
/// Every successful fetch swaps the whole list, readers only ever see a complete snapshot.
#[derive(Clone, Default)]
pub struct GiveawayStore {
    giveaways: Arc<RwLock<Vec<Giveaway>>>,
    stats: Arc<RwLock<Option<CommunityStats>>>,
}

impl GiveawayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, giveaways: Vec<Giveaway>) {
        *self.giveaways.write().await = giveaways;
    }

    pub async fn all(&self) -> Vec<Giveaway> {
        self.giveaways.read().await.clone()
    }

    pub async fn active(&self, now: OffsetDateTime) -> Vec<Giveaway> {
        active_giveaways(&self.giveaways.read().await, now)
    }

    pub async fn set_stats(&self, stats: Option<CommunityStats>) {
        *self.stats.write().await = stats;
    }

    pub async fn stats(&self) -> Option<CommunityStats> {
        self.stats.read().await.clone()
    }
}

/// Giveaways whose end date is strictly after `now`, in list order
pub fn active_giveaways(giveaways: &[Giveaway], now: OffsetDateTime) -> Vec<Giveaway> {
    giveaways
        .iter()
        .filter(|giveaway| giveaway.is_active_at(now))
        .cloned()
        .collect()
}
