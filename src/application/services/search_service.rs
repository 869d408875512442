use super::follow_graph::collect_following_ids;
use super::post_decorator::{DecoratedPost, PostDecorator};
use crate::application::ports::repositories::PostRepository;
use crate::application::ports::user_service::FollowGraph;
use crate::domain::entities::Identity;
use crate::domain::post_filter::{PostFilter, TagPredicate};
use crate::domain::value_objects::{Page, PageRequest, normalize_tags};
use crate::shared::config::FeedConfig;
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// Splits a word query on whitespace, dropping blanks and repeats.
pub fn split_words(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

pub struct SearchService {
    posts: Arc<dyn PostRepository>,
    follow_graph: Arc<dyn FollowGraph>,
    decorator: Arc<PostDecorator>,
    config: FeedConfig,
}

impl SearchService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        follow_graph: Arc<dyn FollowGraph>,
        decorator: Arc<PostDecorator>,
        config: FeedConfig,
    ) -> Self {
        Self {
            posts,
            follow_graph,
            decorator,
            config,
        }
    }

    /// Posts carrying every requested tag. An empty tag list yields an empty
    /// page.
    pub async fn search_hashtags(
        &self,
        identity: &Identity,
        tags: Vec<String>,
        from_time: DateTime<Utc>,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<DecoratedPost>, AppError> {
        let page = PageRequest::new(skip, limit, &self.config);
        let tags = normalize_tags(tags);
        if tags.is_empty() {
            return Ok(Page::empty(page.limit));
        }

        let filter = PostFilter::before(from_time).tagged(TagPredicate::AllOf(tags));
        self.run(identity, filter, page).await
    }

    /// Posts whose content contains any of the space-separated words.
    pub async fn search_words(
        &self,
        identity: &Identity,
        query: &str,
        from_time: DateTime<Utc>,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<DecoratedPost>, AppError> {
        let page = PageRequest::new(skip, limit, &self.config);
        let words = split_words(query);
        if words.is_empty() {
            return Ok(Page::empty(page.limit));
        }

        let filter = PostFilter::before(from_time).containing_any(words);
        self.run(identity, filter, page).await
    }

    async fn run(
        &self,
        identity: &Identity,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<DecoratedPost>, AppError> {
        let following_ids =
            collect_following_ids(self.follow_graph.as_ref(), &identity.user_id).await?;
        let filter = filter.visible_via(following_ids);
        let rows = self.posts.find_posts(&filter, page).await?;
        self.decorator
            .decorate_page(&identity.user_id, page.paginate(rows))
            .await
    }
}
