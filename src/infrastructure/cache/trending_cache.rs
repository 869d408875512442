use crate::application::ports::cache::TrendingCache;
use crate::domain::trending::TrendingTag;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Snapshot {
    ranking: Vec<TrendingTag>,
    expires_at: Instant,
}

/// Holds the latest trending ranking until `ttl` elapses or it is invalidated.
pub struct TrendingCacheService {
    snapshot: RwLock<Option<Snapshot>>,
    ttl: Duration,
}

impl TrendingCacheService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: RwLock::new(None),
            ttl,
        }
    }
}

#[async_trait]
impl TrendingCache for TrendingCacheService {
    async fn get(&self) -> Option<Vec<TrendingTag>> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()
            .filter(|snapshot| snapshot.expires_at > Instant::now())
            .map(|snapshot| snapshot.ranking.clone())
    }

    async fn store(&self, ranking: Vec<TrendingTag>) {
        *self.snapshot.write().await = Some(Snapshot {
            ranking,
            expires_at: Instant::now() + self.ttl,
        });
    }

    async fn invalidate(&self) {
        self.snapshot.write().await.take();
    }
}
