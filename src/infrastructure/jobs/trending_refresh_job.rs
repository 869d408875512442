use crate::application::services::TrendingService;
use crate::shared::error::AppError;
use crate::shared::metrics;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

pub struct TrendingRefreshJob {
    service: Arc<TrendingService>,
    interval: Duration,
}

impl TrendingRefreshJob {
    pub fn new(service: Arc<TrendingService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub async fn run_once(&self) -> Result<(), AppError> {
        let started = Instant::now();
        let result = self.service.refresh().await;
        let duration_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

        match &result {
            Ok(ranking) => {
                metrics::inc_trending_refresh(metrics::TRENDING_REFRESH_SUCCESS);
                tracing::info!(
                    target: "feedline::trending",
                    tags_ranked = ranking.len(),
                    top_tag = ranking.first().map(|t| t.tag.as_str()).unwrap_or(""),
                    duration_ms,
                    "trending refresh completed"
                );
            }
            Err(err) => {
                metrics::inc_trending_refresh(metrics::TRENDING_REFRESH_ERROR);
                tracing::warn!(
                    target: "feedline::trending",
                    error = %err,
                    duration_ms,
                    "trending refresh failed"
                );
            }
        }

        result.map(|_| ())
    }

    /// Refreshes on a fixed interval until the task is aborted. Failures are
    /// logged and retried on the next tick.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = self.run_once().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::repositories::TrendingSource;
    use crate::application::ports::cache::TrendingCache;
    use crate::domain::trending::TagOccurrence;
    use crate::infrastructure::cache::TrendingCacheService;
    use crate::shared::config::TrendingConfig;
    use async_trait::async_trait;
    use chrono::Utc;

    struct FlakySource {
        fail: bool,
    }

    #[async_trait]
    impl TrendingSource for FlakySource {
        async fn tag_occurrences(&self) -> Result<Vec<TagOccurrence>, AppError> {
            if self.fail {
                return Err(AppError::StorageFailure("database is locked".into()));
            }
            Ok(vec![TagOccurrence::new("rust", Utc::now())])
        }
    }

    fn job(fail: bool, cache: Arc<TrendingCacheService>) -> TrendingRefreshJob {
        let service = TrendingService::new(
            Arc::new(FlakySource { fail }),
            cache,
            TrendingConfig::default(),
        );
        TrendingRefreshJob::new(Arc::new(service), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn run_once_stores_fresh_snapshot() {
        let cache = Arc::new(TrendingCacheService::new(Duration::from_secs(60)));
        job(false, cache.clone()).run_once().await.unwrap();

        let snapshot = cache.get().await.expect("snapshot cached");
        assert_eq!(snapshot[0].tag, "rust");
    }

    #[tokio::test]
    async fn run_once_surfaces_source_errors() {
        let cache = Arc::new(TrendingCacheService::new(Duration::from_secs(60)));
        let err = job(true, cache.clone()).run_once().await.unwrap_err();
        assert!(matches!(err, AppError::StorageFailure(_)));
        assert!(cache.get().await.is_none());
    }
}
