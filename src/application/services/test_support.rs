use crate::application::ports::cache::TrendingCache;
use crate::application::ports::event_publisher::{ContentEvent, EventPublisher};
use crate::application::ports::notifier::{Notification, Notifier};
use crate::application::ports::user_service::{FollowGraph, FollowingPage, UserDirectory};
use crate::domain::entities::AuthorInfo;
use crate::domain::trending::TrendingTag;
use crate::infrastructure::database::sqlite_repository::memory_repository;
use crate::infrastructure::database::SqliteRepository;
use crate::shared::error::AppError;
use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;

mock! {
    pub FollowGraphPort {}

    #[async_trait]
    impl FollowGraph for FollowGraphPort {
        async fn following_page(
            &self,
            user_id: &str,
            offset: u32,
            limit: u32,
        ) -> Result<FollowingPage, AppError>;
    }
}

mock! {
    pub Directory {}

    #[async_trait]
    impl UserDirectory for Directory {
        async fn author_info(&self, user_id: &str) -> Result<AuthorInfo, AppError>;
        async fn interest_tags(&self, user_id: &str) -> Result<Vec<String>, AppError>;
    }
}

mock! {
    pub NotifierPort {}

    #[async_trait]
    impl Notifier for NotifierPort {
        async fn notify(&self, notification: &Notification) -> Result<(), AppError>;
    }
}

mock! {
    pub Publisher {}

    #[async_trait]
    impl EventPublisher for Publisher {
        async fn publish(&self, event: &ContentEvent) -> Result<(), AppError>;
    }
}

mock! {
    pub Cache {}

    #[async_trait]
    impl TrendingCache for Cache {
        async fn get(&self) -> Option<Vec<TrendingTag>>;
        async fn store(&self, ranking: Vec<TrendingTag>);
        async fn invalidate(&self);
    }
}

pub fn author(id: &str) -> AuthorInfo {
    AuthorInfo {
        id: id.to_string(),
        username: id.to_string(),
        display_name: id.to_uppercase(),
        photo_url: None,
    }
}

/// Follow graph answering with a fixed list for every user.
pub fn follow_graph(ids: &[&str]) -> MockFollowGraphPort {
    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let mut graph = MockFollowGraphPort::new();
    graph.expect_following_page().returning(move |_, offset, _| {
        Ok(if offset == 0 {
            FollowingPage {
                ids: ids.clone(),
                next_offset: None,
            }
        } else {
            FollowingPage::default()
        })
    });
    graph
}

/// Directory resolving every user and returning `interests` for everyone.
pub fn directory(interests: &[&str]) -> MockDirectory {
    let interests: Vec<String> = interests.iter().map(|tag| tag.to_string()).collect();
    let mut directory = MockDirectory::new();
    directory
        .expect_author_info()
        .returning(|id| Ok(author(id)));
    directory
        .expect_interest_tags()
        .returning(move |_| Ok(interests.clone()));
    directory
}

pub fn noop_cache() -> MockCache {
    let mut cache = MockCache::new();
    cache.expect_get().returning(|| None);
    cache.expect_store().returning(|_| ());
    cache.expect_invalidate().returning(|| ());
    cache
}

pub async fn repository() -> Arc<SqliteRepository> {
    Arc::new(memory_repository().await)
}
