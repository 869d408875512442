use crate::application::ports::cache::TrendingCache;
use crate::application::ports::repositories::TrendingSource;
use crate::domain::trending::{TrendingTag, rank_tags};
use crate::shared::config::TrendingConfig;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub struct TrendingService {
    source: Arc<dyn TrendingSource>,
    cache: Arc<dyn TrendingCache>,
    config: TrendingConfig,
}

impl TrendingService {
    pub fn new(
        source: Arc<dyn TrendingSource>,
        cache: Arc<dyn TrendingCache>,
        config: TrendingConfig,
    ) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    /// Serves the cached ranking while it is fresh, otherwise recomputes it.
    pub async fn trending_topics(&self) -> Result<Vec<TrendingTag>, AppError> {
        if let Some(ranking) = self.cache.get().await {
            return Ok(ranking);
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<Vec<TrendingTag>, AppError> {
        let occurrences = self.source.tag_occurrences().await?;
        let ranking = rank_tags(
            occurrences,
            Utc::now(),
            self.config.decay_rate,
            self.config.top_n,
        );
        self.cache.store(ranking.clone()).await;
        Ok(ranking)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}
