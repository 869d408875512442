pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;

use crate::application::ports::{EventPublisher, Notifier, TrendingCache};
use crate::application::services::PostDecorator;
use crate::application::{
    FeedService, InteractionService, PostService, SearchService, TrendingService,
};
use crate::infrastructure::cache::TrendingCacheService;
use crate::infrastructure::database::{ConnectionPool, SqliteRepository};
use crate::infrastructure::gateways::{HttpNotifier, NoopNotifier, UserServiceClient};
use crate::infrastructure::jobs::TrendingRefreshJob;
use crate::infrastructure::messaging::{AmqpEventPublisher, NoopEventPublisher};
use crate::presentation::http::server;
use crate::presentation::{build_router, AppState};
use crate::shared::AppConfig;
use std::sync::Arc;
use std::time::Duration;

pub const SERVICE_NAME: &str = "feedline";

/// Collaborators the HTTP state is assembled from. Production wiring builds
/// these from [`AppConfig`]; tests substitute in-process fakes.
pub struct Collaborators {
    pub repository: Arc<SqliteRepository>,
    pub users: Arc<UserServiceClient>,
    pub notifier: Arc<dyn Notifier>,
    pub publisher: Arc<dyn EventPublisher>,
}

pub fn build_state(config: &AppConfig, collaborators: Collaborators) -> AppState {
    let Collaborators {
        repository,
        users,
        notifier,
        publisher,
    } = collaborators;

    let refresh_interval = Duration::from_secs(config.trending.refresh_interval_secs);
    let trending_cache: Arc<dyn TrendingCache> =
        Arc::new(TrendingCacheService::new(refresh_interval));

    let decorator = Arc::new(PostDecorator::new(users.clone(), repository.clone()));
    let interactions = Arc::new(InteractionService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        trending_cache.clone(),
    ));
    let posts = Arc::new(PostService::new(
        repository.clone(),
        users.clone(),
        notifier,
        publisher,
        interactions.clone(),
        decorator.clone(),
        trending_cache.clone(),
        config.feed,
    ));
    let feeds = Arc::new(FeedService::new(
        repository.clone(),
        repository.clone(),
        users.clone(),
        users.clone(),
        decorator.clone(),
        config.feed,
    ));
    let search = Arc::new(SearchService::new(
        repository.clone(),
        users.clone(),
        decorator,
        config.feed,
    ));
    let trending = Arc::new(TrendingService::new(
        repository.clone(),
        trending_cache,
        config.trending,
    ));

    AppState {
        posts,
        feeds,
        search,
        trending,
        interactions,
        identity: users,
        repository,
    }
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let pool = ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
    let repository = Arc::new(SqliteRepository::new(pool.clone()));
    repository.initialize().await?;

    let timeout = Duration::from_secs(config.upstream.timeout_secs);
    let users = Arc::new(UserServiceClient::new(
        &config.upstream.user_service_url,
        timeout,
    )?);

    let notifier: Arc<dyn Notifier> = match config.upstream.notification_service_url.as_deref() {
        Some(url) => Arc::new(HttpNotifier::new(url, timeout)?),
        None => {
            tracing::info!("notification service not configured; mentions are not delivered");
            Arc::new(NoopNotifier)
        }
    };

    let publisher: Arc<dyn EventPublisher> = match config.queue.amqp_url.as_deref() {
        Some(url) => Arc::new(AmqpEventPublisher::connect(url, &config.queue).await?),
        None => {
            tracing::info!("amqp not configured; content events are skipped");
            Arc::new(NoopEventPublisher)
        }
    };

    let state = build_state(
        &config,
        Collaborators {
            repository,
            users,
            notifier,
            publisher,
        },
    );

    let refresh_job = config.trending.enabled.then(|| {
        TrendingRefreshJob::new(
            state.trending.clone(),
            Duration::from_secs(config.trending.refresh_interval_secs),
        )
        .spawn()
    });

    let router = build_router(state, SERVICE_NAME);
    let result = server::serve(config.server.addr, router, server::shutdown_signal()).await;

    if let Some(handle) = refresh_job {
        handle.abort();
    }
    pool.close().await;
    result
}
