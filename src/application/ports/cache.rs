use crate::domain::trending::TrendingTag;
use async_trait::async_trait;

/// Holds the most recent trending ranking.
#[async_trait]
pub trait TrendingCache: Send + Sync {
    /// Returns the snapshot while it is still fresh.
    async fn get(&self) -> Option<Vec<TrendingTag>>;
    async fn store(&self, ranking: Vec<TrendingTag>);
    async fn invalidate(&self);
}
