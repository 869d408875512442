use crate::domain::entities::{MediaInfo, Post};
use crate::domain::post_filter::PostFilter;
use crate::domain::trending::TagOccurrence;
use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Post Store Adapter.
///
/// Field setters and counter increments address a canonical post id and apply
/// to the original row together with every retweet row that references it.
/// Each is a single atomic statement; a missing row is reported as
/// [`AppError::NotFound`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &Post) -> Result<(), AppError>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError>;
    /// Returns up to `page.fetch_limit()` non-blocked rows matching `filter`,
    /// newest first, after skipping `page.skip`.
    async fn find_posts(&self, filter: &PostFilter, page: PageRequest)
    -> Result<Vec<Post>, AppError>;
    async fn increment_likes(&self, post_id: &str, delta: i64) -> Result<(), AppError>;
    async fn increment_retweets(&self, post_id: &str, delta: i64) -> Result<(), AppError>;
    async fn set_tags(&self, post_id: &str, tags: &[String]) -> Result<(), AppError>;
    async fn set_content(&self, post_id: &str, content: &str) -> Result<(), AppError>;
    async fn set_public(&self, post_id: &str, public: bool) -> Result<(), AppError>;
    async fn set_media(&self, post_id: &str, media: Option<&MediaInfo>) -> Result<(), AppError>;
    async fn set_mentions(&self, post_id: &str, mentions: &[String]) -> Result<(), AppError>;
    async fn set_blocked(&self, post_id: &str, blocked: bool) -> Result<(), AppError>;
    /// Deletes a post. For an original this also removes its likes, retweets,
    /// bookmarks and retweet rows.
    async fn delete_post(&self, id: &str) -> Result<(), AppError>;
}

/// Like and Retweet relations. `add_*` returns `false` when the pair already
/// existed, `remove_*` when there was nothing to remove.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn has_liked(&self, post_id: &str, user_id: &str) -> Result<bool, AppError>;
    async fn add_like(&self, post_id: &str, user_id: &str) -> Result<bool, AppError>;
    async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<bool, AppError>;
    async fn liked_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError>;

    async fn has_retweeted(&self, original_post_id: &str, user_id: &str)
    -> Result<bool, AppError>;
    /// Records the (original, actor) pair, stores the reshare row and bumps
    /// the retweet counter as one unit. Returns false, writing nothing, when
    /// the pair already exists.
    async fn add_retweet(&self, retweet: &Post) -> Result<bool, AppError>;
    /// Removes the pair and returns the id of the retweet row it pointed at.
    async fn remove_retweet(
        &self,
        original_post_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, AppError>;
    async fn retweeted_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError>;
}

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    async fn add_bookmark(&self, user_id: &str, post_id: &str) -> Result<bool, AppError>;
    async fn remove_bookmark(&self, user_id: &str, post_id: &str) -> Result<bool, AppError>;
    /// Bookmarked, non-blocked posts, most recently bookmarked first. Returns up
    /// to `page.fetch_limit()` rows.
    async fn list_bookmarked_posts(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Vec<Post>, AppError>;
}

#[async_trait]
pub trait TrendingSource: Send + Sync {
    /// Every `(tag, created_at)` pair across the post collection. Rows whose tag
    /// list or timestamp is malformed are skipped.
    async fn tag_occurrences(&self) -> Result<Vec<TagOccurrence>, AppError>;
}
